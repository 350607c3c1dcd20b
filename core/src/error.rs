//! Error types for the todo client and the reconciliation engine.
//!
//! # Design
//! `ApiError` is what the repository layer returns: anything that went wrong
//! between building a request and decoding its response. The engine never
//! lets an `ApiError` escape on its own; each operation wraps it into a
//! `ReconcileError` whose `Display` is the text shown in the error banner.
//! `NotFound` gets a dedicated variant because a 404 on delete or update is
//! the common "someone else already removed it" case.

use thiserror::Error;

use crate::types::TodoId;

/// Failure of a single request against the remote todo store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// User-facing category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Add,
    Delete,
    Update,
    EmptyTitle,
}

impl ErrorKind {
    /// Banner text for this kind of failure.
    pub const fn message(self) -> &'static str {
        match self {
            ErrorKind::Load => "Unable to load todos",
            ErrorKind::Add => "Unable to add a todo",
            ErrorKind::Delete => "Unable to delete a todo",
            ErrorKind::Update => "Unable to update a todo",
            ErrorKind::EmptyTitle => "Title should not be empty",
        }
    }
}

/// Failure of an engine operation. The collection is always left in its
/// last-known-good state when one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Unable to load todos")]
    Load(#[source] ApiError),

    #[error("Unable to add a todo")]
    Add(#[source] ApiError),

    #[error("Unable to delete a todo")]
    Delete(#[source] ApiError),

    /// Some deletes of a bulk clear failed; the rest were applied.
    #[error("Unable to delete a todo")]
    PartialDelete { failed: Vec<TodoId> },

    #[error("Unable to update a todo")]
    Update(#[source] ApiError),

    #[error("Title should not be empty")]
    EmptyTitle,
}

impl ReconcileError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::Load(_) => ErrorKind::Load,
            ReconcileError::Add(_) => ErrorKind::Add,
            ReconcileError::Delete(_) | ReconcileError::PartialDelete { .. } => ErrorKind::Delete,
            ReconcileError::Update(_) => ErrorKind::Update,
            ReconcileError::EmptyTitle => ErrorKind::EmptyTitle,
        }
    }
}

/// Invalid or missing engine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TODO_USER_ID is not set; a user id is required to load todos")]
    MissingUserId,

    #[error("TODO_USER_ID must be a positive integer, got {0:?}")]
    InvalidUserId(String),
}
