//! In-process transport whose requests are answered by the test body.
//!
//! # Design
//! Every `execute` call parks on a oneshot and hands the request to the
//! test through an mpsc channel. The test decides when and how each request
//! settles, which makes completion order fully deterministic.

#![allow(dead_code)]

use std::future::Future;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use todo_core::{
    ApiError, Engine, EngineConfig, HttpMethod, HttpRequest, HttpResponse, Todo, TodoId, Transport,
    UserId,
};

pub const BASE_URL: &str = "http://todos.test";
pub const USER: UserId = UserId::new(3633);

pub struct ScriptedTransport {
    requests: mpsc::UnboundedSender<Pending>,
}

pub struct Server {
    requests: mpsc::UnboundedReceiver<Pending>,
}

pub struct Pending {
    pub request: HttpRequest,
    reply: oneshot::Sender<Result<HttpResponse, ApiError>>,
}

pub fn scripted() -> (ScriptedTransport, Server) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ScriptedTransport { requests: tx }, Server { requests: rx })
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        let requests = self.requests.clone();
        async move {
            let (reply, response) = oneshot::channel();
            requests
                .send(Pending { request, reply })
                .map_err(|_| ApiError::Transport("server gone".to_string()))?;
            response
                .await
                .map_err(|_| ApiError::Transport("request dropped".to_string()))?
        }
    }
}

impl Server {
    pub async fn next(&mut self) -> Pending {
        self.requests.recv().await.expect("engine sent no request")
    }

    /// Collect exactly `n` requests.
    pub async fn take(&mut self, n: usize) -> Vec<Pending> {
        let mut pending = Vec::with_capacity(n);
        for _ in 0..n {
            pending.push(self.next().await);
        }
        pending
    }

    pub fn is_idle(&mut self) -> bool {
        self.requests.try_recv().is_err()
    }
}

impl Pending {
    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// Id in a `/todos/{id}` path.
    pub fn todo_id(&self) -> TodoId {
        let raw = self.path().rsplit('/').next().expect("path has segments");
        TodoId::new(raw.parse().expect("path ends in an id"))
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_str(self.request.body.as_deref().expect("request has a body"))
            .expect("body is json")
    }

    pub fn respond(self, status: u16, body: impl Into<String>) {
        let _ = self.reply.send(Ok(HttpResponse::new(status, body)));
    }

    pub fn respond_json(self, status: u16, value: &impl Serialize) {
        let body = serde_json::to_string(value).expect("serializable");
        self.respond(status, body);
    }

    pub fn fail(self) {
        self.respond(500, "internal error");
    }

    pub fn disconnect(self) {
        let _ = self
            .reply
            .send(Err(ApiError::Transport("connection reset".to_string())));
    }
}

pub fn todo(id: u64, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId::new(id),
        title: title.to_string(),
        completed,
        user_id: USER,
    }
}

pub fn engine() -> (Engine<ScriptedTransport>, Server) {
    let (transport, server) = scripted();
    (Engine::new(EngineConfig::new(BASE_URL, USER), transport), server)
}

/// Engine whose initial load returned `todos`.
pub async fn loaded(todos: &[Todo]) -> (Engine<ScriptedTransport>, Server) {
    let (engine, mut server) = engine();
    let load = tokio::spawn({
        let engine = engine.clone();
        async move { engine.load_all().await }
    });
    server.next().await.respond_json(200, &todos);
    load.await.unwrap().unwrap();
    (engine, server)
}

pub fn ids(todos: &[Todo]) -> Vec<u64> {
    todos.iter().map(|todo| todo.id.get()).collect()
}
