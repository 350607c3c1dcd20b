//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. Ids are
//! newtypes over the server's integers so a todo id can never be confused
//! with a user id. A todo that has not been persisted yet is a `CreateTodo`,
//! which has no id field at all.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a persisted todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of a todo list. Constant for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub user_id: UserId,
}

/// Request payload for creating a new todo. Doubles as the optimistic
/// placeholder shown while the create request is in flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: UserId,
}

/// Request payload for patching an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_server_field_names() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":12,"title":"Read","completed":true,"userId":3}"#)
                .unwrap();
        assert_eq!(todo.id, TodoId::new(12));
        assert_eq!(todo.user_id, UserId::new(3));
        assert!(todo.completed);

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["id"], 12);
    }

    #[test]
    fn create_todo_has_no_id_field() {
        let input = CreateTodo {
            title: "Fresh".to_string(),
            completed: false,
            user_id: UserId::new(1),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["userId"], 1);
    }

    #[test]
    fn update_todo_constructors_set_one_field() {
        let patch = UpdateTodo::completed(true);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"completed":true}"#);

        let patch = UpdateTodo::title("Renamed");
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"title":"Renamed"}"#);
    }
}
