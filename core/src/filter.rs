//! Derived views over the todo collection.

use std::fmt;
use std::str::FromStr;

use crate::types::Todo;

/// Which subset of the collection the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Order-preserving subset of `todos`.
    pub fn apply(self, todos: &[Todo]) -> Vec<Todo> {
        todos.iter().filter(|todo| self.matches(todo)).cloned().collect()
    }

    /// Hash route of the filter link.
    pub const fn fragment(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    /// Unknown routes show everything.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.trim_start_matches('#').trim_matches('/') {
            "active" => Filter::Active,
            "completed" => Filter::Completed,
            _ => Filter::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::from_fragment(s))
    }
}
