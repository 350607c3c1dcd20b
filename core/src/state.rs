//! The reconciled state the presentation layer renders from.
//!
//! # Design
//! `Snapshot` is a plain value. The engine owns the only writable copy and
//! publishes it through a `watch` channel; readers get clones. Every field
//! here is updated by one synchronous step of an engine operation, so a
//! reader never sees a half-applied mutation.

use std::collections::BTreeMap;

use crate::error::ErrorKind;
use crate::filter::Filter;
use crate::types::{CreateTodo, Todo, TodoId};

/// Ids with at least one request in flight.
///
/// Counts requests per id: toggling the same todo twice before the first
/// response arrives keeps it loading until both have settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingSet {
    pending: BTreeMap<TodoId, usize>,
}

impl LoadingSet {
    pub fn insert(&mut self, id: TodoId) {
        *self.pending.entry(id).or_default() += 1;
    }

    /// Settle one request for `id`.
    pub fn remove(&mut self, id: TodoId) {
        if let Some(count) = self.pending.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&id);
            }
        }
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TodoId> + '_ {
        self.pending.keys().copied()
    }
}

/// The todo whose title is being edited, with the draft text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
    pub id: TodoId,
    pub query: String,
}

/// Single-slot error banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBanner {
    kind: Option<ErrorKind>,
    generation: u64,
}

impl ErrorBanner {
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn message(&self) -> Option<&'static str> {
        self.kind.map(ErrorKind::message)
    }

    pub fn is_visible(&self) -> bool {
        self.kind.is_some()
    }

    /// Show `kind`, replacing whatever was there, and return the token the
    /// auto-dismiss timer must present to clear it.
    pub(crate) fn raise(&mut self, kind: ErrorKind) -> u64 {
        self.generation += 1;
        self.kind = Some(kind);
        self.generation
    }

    /// Clear only if nothing newer was raised since `generation`.
    pub(crate) fn expire(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.kind.is_some() {
            self.kind = None;
            return true;
        }
        false
    }

    pub(crate) fn clear(&mut self) -> bool {
        self.kind.take().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Authoritative collection in server order.
    pub todos: Vec<Todo>,
    /// Optimistic row for a create request in flight.
    pub placeholder: Option<CreateTodo>,
    pub loading: LoadingSet,
    pub editing: Option<Editing>,
    pub error: ErrorBanner,
    /// True until the initial load settles.
    pub loading_all: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            placeholder: None,
            loading: LoadingSet::default(),
            editing: None,
            error: ErrorBanner::default(),
            loading_all: true,
        }
    }
}

impl Snapshot {
    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub(crate) fn todo_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    pub fn visible(&self, filter: Filter) -> Vec<Todo> {
        filter.apply(&self.todos)
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Vacuously true for an empty collection.
    pub fn all_completed(&self) -> bool {
        self.todos.iter().all(|todo| todo.completed)
    }

    /// Whether the row for `id` should show its loading overlay.
    pub fn is_loading(&self, id: TodoId) -> bool {
        self.loading_all || self.loading.contains(id)
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.editing.as_ref().is_some_and(|editing| editing.id == id)
    }

    pub(crate) fn stop_editing(&mut self, id: TodoId) {
        if self.is_editing(id) {
            self.editing = None;
        }
    }
}
