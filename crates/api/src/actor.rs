//! One serialized worker per resource name.
//!
//! ```text
//! PassRegistry (one per process)
//! └── PassActor (one per resource name, spawned on first use)
//!     └── owns the mailbox; runs dispatch::execute for one request at a time
//! ```
//!
//! Each actor drains its mailbox strictly in order and finishes a request
//! (load, decide, persist) before receiving the next one, so requests for the
//! same name never interleave. Actors for different names share nothing but
//! the store handle.
//!
//! The actor keeps no pass state in memory. The only thing it remembers is
//! whether the one-time migration has already been confirmed for its name.

use std::collections::HashMap;
use std::sync::Arc;

use hallpass_core::outcome::PassOutcome;
use hallpass_core::request::PassRequest;
use hallpass_db::{migration, PassStorage, PassStore, StoreError};
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::dispatch;

/// Requests that may queue for a single actor before senders wait.
const MAILBOX_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Pass actor for '{0}' is not running")]
    Stopped(String),
}

struct PassCommand {
    request: PassRequest,
    reply: oneshot::Sender<Result<PassOutcome, StoreError>>,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cheaply cloneable sender side of a [`PassActor`].
#[derive(Clone)]
pub struct PassActorHandle {
    resource: Arc<str>,
    sender: mpsc::Sender<PassCommand>,
}

impl PassActorHandle {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queue `request` and wait for its outcome.
    pub async fn send(&self, request: PassRequest) -> Result<PassOutcome, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(PassCommand { request, reply })
            .await
            .map_err(|_| ActorError::Stopped(self.resource.to_string()))?;
        let result = rx
            .await
            .map_err(|_| ActorError::Stopped(self.resource.to_string()))?;
        Ok(result?)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The worker task that owns one resource name's records.
pub struct PassActor {
    storage: PassStorage,
    receiver: mpsc::Receiver<PassCommand>,
    cancel: CancellationToken,
    migrated: bool,
}

impl PassActor {
    /// Create an actor and its handle. The caller spawns [`PassActor::run`].
    pub fn new(storage: PassStorage, cancel: CancellationToken) -> (Self, PassActorHandle) {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let handle = PassActorHandle {
            resource: Arc::from(storage.resource()),
            sender,
        };
        let actor = Self {
            storage,
            receiver,
            cancel,
            migrated: false,
        };
        (actor, handle)
    }

    /// Process commands until cancelled or every handle is dropped.
    ///
    /// The one-time migration runs before the first command is received. If
    /// it fails, it is attempted again ahead of the next command and that
    /// command receives the error.
    pub async fn run(mut self) {
        tracing::info!(resource = %self.storage.resource(), "Pass actor started");

        if let Err(e) = self.ensure_migrated().await {
            tracing::error!(resource = %self.storage.resource(), error = %e, "Pass store migration failed");
        }

        loop {
            let command = tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.receiver.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };
            // Handled to completion; cancellation is only observed between commands.
            let result = self.handle(command.request).await;
            let _ = command.reply.send(result);
        }

        tracing::info!(resource = %self.storage.resource(), "Pass actor stopped");
    }

    async fn handle(&mut self, request: PassRequest) -> Result<PassOutcome, StoreError> {
        self.ensure_migrated().await?;

        let action = request.action();
        tracing::debug!(resource = %self.storage.resource(), %action, "Handling pass request");
        dispatch::execute(&self.storage, request, hallpass_core::types::now()).await
    }

    async fn ensure_migrated(&mut self) -> Result<(), StoreError> {
        if !self.migrated {
            migration::run_once(&self.storage).await?;
            self.migrated = true;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Spawns and tracks one [`PassActor`] per resource name.
pub struct PassRegistry {
    store: Arc<dyn PassStore>,
    actors: RwLock<HashMap<String, PassActorHandle>>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl PassRegistry {
    pub fn new(store: Arc<dyn PassStore>) -> Self {
        Self {
            store,
            actors: RwLock::new(HashMap::new()),
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn PassStore> {
        &self.store
    }

    /// Get the handle for `resource`, spawning its actor on first use.
    pub async fn handle(&self, resource: &str) -> Result<PassActorHandle, ActorError> {
        if let Some(handle) = self.actors.read().await.get(resource) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
        }

        if self.cancel.is_cancelled() {
            return Err(ActorError::Stopped(resource.to_string()));
        }

        let mut actors = self.actors.write().await;
        // Another caller may have spawned it while we waited for the lock.
        if let Some(handle) = actors.get(resource) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
        }

        let storage = PassStorage::new(Arc::clone(&self.store), resource);
        let (actor, handle) = PassActor::new(storage, self.cancel.child_token());
        self.tracker.spawn(actor.run());
        actors.insert(resource.to_string(), handle.clone());
        Ok(handle)
    }

    /// Route `request` to the actor for `resource`.
    pub async fn dispatch(
        &self,
        resource: &str,
        request: PassRequest,
    ) -> Result<PassOutcome, ActorError> {
        self.handle(resource).await?.send(request).await
    }

    /// Number of live actors.
    pub async fn actor_count(&self) -> usize {
        self.actors
            .read()
            .await
            .values()
            .filter(|h| !h.is_closed())
            .count()
    }

    /// Stop every actor after its current command and wait for them to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        self.actors.write().await.clear();
        tracing::info!("All pass actors stopped");
    }
}
