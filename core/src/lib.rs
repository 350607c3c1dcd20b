//! Client core for a todo list backed by a REST store.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). A `Transport`
//! executes the round-trip, `TodoRepository` strings the three steps
//! together, and `Engine` keeps an optimistic local copy of the list in step
//! with the server while requests are in flight.
//!
//! # Design
//! - `TodoClient` is stateless apart from `base_url` and the user id.
//! - Each CRUD operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable without a server.
//! - `Engine` publishes immutable `Snapshot`s through a `watch` channel; the
//!   presentation layer renders them and calls back with intents.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod http;
pub mod repository;
pub mod state;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ApiError, ConfigError, ErrorKind, ReconcileError};
pub use filter::Filter;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use repository::TodoRepository;
pub use state::{Editing, ErrorBanner, LoadingSet, Snapshot};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo, UserId};
