//! Async CRUD over a `Transport`.
//!
//! Each call is a single attempt: build the request, execute it, parse the
//! response. No retries and no timeout; the caller decides what a failure
//! means.

use tracing::debug;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

#[derive(Debug)]
pub struct TodoRepository<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoRepository<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    pub async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_create_todo(input)?).await?;
        self.client.parse_create_todo(response)
    }

    pub async fn update(&self, id: TodoId, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_update_todo(id, input)?).await?;
        self.client.parse_update_todo(response)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
