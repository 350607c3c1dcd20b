//! Optimistic-update reconciliation between local state and the todo API.
//!
//! # Design
//! The engine owns a `watch` channel holding the current `Snapshot`. Every
//! operation follows the same shape: one synchronous step that marks what is
//! in flight, a single await on the repository, then one synchronous step
//! that folds the outcome into whatever the snapshot looks like at that
//! moment. No lock or borrow is held across an await, so any number of
//! operations on different todos can be in flight at once.
//!
//! Failures never escape as raw `ApiError`s. Each operation wraps its
//! failure into a `ReconcileError`, shows it in the error banner and leaves
//! the collection as it was before the request.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::config::EngineConfig;
use crate::error::{ErrorKind, ReconcileError};
use crate::repository::TodoRepository;
use crate::state::{Editing, Snapshot};
use crate::transport::Transport;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

pub struct Engine<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    repository: TodoRepository<T>,
    config: EngineConfig,
    state: watch::Sender<Snapshot>,
}

impl<T> Clone for Engine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> Engine<T> {
    pub fn new(config: EngineConfig, transport: T) -> Self {
        let client = TodoClient::new(&config.base_url, config.user_id);
        let (state, _) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(Inner {
                repository: TodoRepository::new(client, transport),
                config,
                state,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    /// Replace the collection with the server's list for the configured user.
    pub async fn load_all(&self) -> Result<(), ReconcileError> {
        self.update(|s| {
            s.error.clear();
            s.loading_all = true;
        });

        let result = self.inner.repository.list().await;

        self.update(|s| {
            s.loading_all = false;
            match &result {
                Ok(todos) => s.todos = todos.clone(),
                Err(_) => s.todos.clear(),
            }
        });

        match result {
            Ok(todos) => {
                info!(count = todos.len(), user_id = %self.inner.config.user_id, "loaded todos");
                Ok(())
            }
            Err(source) => Err(self.fail(ReconcileError::Load(source))),
        }
    }

    /// Form submission: reject a blank title, otherwise add it trimmed.
    pub async fn submit(&self, raw: &str) -> Result<Todo, ReconcileError> {
        let title = raw.trim();
        if title.is_empty() {
            return Err(self.fail(ReconcileError::EmptyTitle));
        }
        self.add(title).await
    }

    /// Create a todo, showing a placeholder row until the server answers.
    ///
    /// Blank titles are the caller's to reject; see [`Engine::submit`].
    pub async fn add(&self, title: &str) -> Result<Todo, ReconcileError> {
        let draft = CreateTodo {
            title: title.trim().to_string(),
            completed: false,
            user_id: self.inner.config.user_id,
        };
        self.update(|s| s.placeholder = Some(draft.clone()));
        debug!(title = %draft.title, "adding todo");

        let result = self.inner.repository.create(&draft).await;

        self.update(|s| {
            s.placeholder = None;
            if let Ok(todo) = &result {
                s.todos.push(todo.clone());
            }
        });

        result.map_err(|source| self.fail(ReconcileError::Add(source)))
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), ReconcileError> {
        self.update(|s| s.loading.insert(id));
        debug!(%id, "deleting todo");

        let result = self.inner.repository.delete(id).await;

        self.update(|s| {
            s.loading.remove(id);
            if result.is_ok() {
                s.todos.retain(|todo| todo.id != id);
                s.stop_editing(id);
            }
        });

        result.map_err(|source| self.fail(ReconcileError::Delete(source)))
    }

    /// Delete every completed todo, one request each, and wait for all of
    /// them. Successful deletes are applied even when others fail.
    ///
    /// Returns the ids that were removed.
    pub async fn delete_completed(&self) -> Result<Vec<TodoId>, ReconcileError> {
        let ids: Vec<TodoId> = self.read(|s| {
            s.todos
                .iter()
                .filter(|todo| todo.completed)
                .map(|todo| todo.id)
                .collect()
        });
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.update(|s| ids.iter().for_each(|&id| s.loading.insert(id)));
        debug!(count = ids.len(), "clearing completed todos");

        let results = join_all(ids.iter().map(|&id| self.inner.repository.delete(id))).await;

        let mut deleted = Vec::with_capacity(ids.len());
        let mut failed = Vec::new();
        for (&id, result) in ids.iter().zip(results) {
            match result {
                Ok(()) => deleted.push(id),
                Err(err) => {
                    debug!(%id, error = %err, "delete failed");
                    failed.push(id);
                }
            }
        }

        self.update(|s| {
            ids.iter().for_each(|&id| s.loading.remove(id));
            s.todos.retain(|todo| !deleted.contains(&todo.id));
            deleted.iter().for_each(|&id| s.stop_editing(id));
        });

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(self.fail(ReconcileError::PartialDelete { failed }))
        }
    }

    /// Patch `completed` and adopt the value the server confirms.
    pub async fn set_completed(&self, id: TodoId, completed: bool) -> Result<(), ReconcileError> {
        self.update(|s| s.loading.insert(id));
        debug!(%id, completed, "setting completed");

        let result = self
            .inner
            .repository
            .update(id, &UpdateTodo::completed(completed))
            .await;

        self.update(|s| {
            s.loading.remove(id);
            if let (Ok(confirmed), Some(todo)) = (&result, s.todo_mut(id)) {
                todo.completed = confirmed.completed;
            }
        });

        result
            .map(|_| ())
            .map_err(|source| self.fail(ReconcileError::Update(source)))
    }

    /// Complete every todo, or un-complete all of them if they already are.
    ///
    /// Each affected todo gets its own `set_completed` task; a failure in one
    /// does not stop or roll back the others. Dropping the handles leaves the
    /// tasks running.
    pub fn toggle_all(&self) -> Vec<JoinHandle<Result<(), ReconcileError>>> {
        let (target, ids) = self.read(|s| {
            let target = !s.all_completed();
            let ids: Vec<TodoId> = s
                .todos
                .iter()
                .filter(|todo| todo.completed != target)
                .map(|todo| todo.id)
                .collect();
            (target, ids)
        });
        debug!(target, count = ids.len(), "toggling all");

        ids.into_iter()
            .map(|id| {
                let engine = self.clone();
                tokio::spawn(async move { engine.set_completed(id, target).await })
            })
            .collect()
    }

    /// Commit an edited title.
    ///
    /// An unchanged title just leaves edit mode; a blank one deletes the
    /// todo. On failure the draft stays open so the user can retry.
    pub async fn rename(&self, id: TodoId, raw: &str) -> Result<(), ReconcileError> {
        let Some(current) = self.read(|s| s.todo(id).map(|todo| todo.title.clone())) else {
            debug!(%id, "rename of unknown todo ignored");
            return Ok(());
        };

        let title = raw.trim();
        if title == current {
            self.update(|s| s.stop_editing(id));
            return Ok(());
        }
        if title.is_empty() {
            return self.delete(id).await;
        }

        self.update(|s| s.loading.insert(id));
        debug!(%id, title, "renaming todo");

        let result = self.inner.repository.update(id, &UpdateTodo::title(title)).await;

        self.update(|s| {
            s.loading.remove(id);
            if let Ok(todo) = &result {
                if let Some(slot) = s.todo_mut(id) {
                    *slot = todo.clone();
                }
                s.stop_editing(id);
            }
        });

        result
            .map(|_| ())
            .map_err(|source| self.fail(ReconcileError::Update(source)))
    }

    /// Open the editor for `id` seeded with its title, or close it with
    /// `None`. Opening a different todo drops the previous draft uncommitted.
    pub fn set_editing(&self, id: Option<TodoId>) {
        self.update(|s| {
            s.editing = id.and_then(|id| {
                s.todo(id).map(|todo| Editing {
                    id,
                    query: todo.title.clone(),
                })
            });
        });
    }

    /// Update the draft text of the open editor.
    pub fn set_query(&self, text: &str) {
        self.inner.state.send_if_modified(|s| match s.editing.as_mut() {
            Some(editing) => {
                editing.query = text.trim_start().to_string();
                true
            }
            None => false,
        });
    }

    pub fn dismiss_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.clear());
    }

    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut Snapshot)) {
        self.inner.state.send_modify(f);
    }

    fn fail(&self, err: ReconcileError) -> ReconcileError {
        warn!(error = ?err, "{err}");
        self.raise(err.kind());
        err
    }

    /// Show `kind` in the banner and schedule its removal. A newer error
    /// bumps the generation, which cancels this removal.
    fn raise(&self, kind: ErrorKind) {
        let mut generation = 0;
        self.update(|s| generation = s.error.raise(kind));

        let timeout = self.inner.config.error_timeout;
        let inner = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = inner.upgrade() {
                inner.state.send_if_modified(|s| s.error.expire(generation));
            }
        });
    }
}
