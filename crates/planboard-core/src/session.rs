//! Session-scoped ownership of the task tree.
//!
//! Each conversation session owns one independent `TaskStore` and its event
//! channel. The handle is passed explicitly to whoever needs it (the tool
//! surface, observers) instead of living in a process-wide singleton, so
//! sessions stay isolated and independently testable.

use crate::task::{Task, TaskEvent, TaskStore};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// One session's task-tracking state.
///
/// Mutations go through the store's write lock, so they are serialized: one
/// mutation is validated and applied before the next is accepted. Snapshot
/// reads take the read lock and therefore always observe a state that existed
/// at some point in the mutation sequence, never a partially applied one.
#[derive(Debug, Clone)]
pub struct TaskSession {
    /// Unique session identifier (UUID format).
    id: String,
    /// Timestamp when the session was created (ISO 8601 format).
    created_at: String,
    /// Shared handle to this session's task store.
    store: Arc<RwLock<TaskStore>>,
}

impl TaskSession {
    /// Creates a session with an empty store and a fresh id.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Creates a session with a caller-provided id.
    pub fn with_id(id: String) -> Self {
        Self {
            id,
            created_at: chrono::Utc::now().to_rfc3339(),
            store: Arc::new(RwLock::new(TaskStore::new())),
        }
    }

    /// The session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the session was created (ISO 8601).
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Clones the shared store handle for a collaborator.
    pub fn store(&self) -> Arc<RwLock<TaskStore>> {
        self.store.clone()
    }

    /// Registers a new event subscriber on this session's channel.
    pub async fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.store.read().await.subscribe()
    }

    /// Pulls a consistent snapshot of the current tree in render order.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.store.read().await.snapshot()
    }
}

impl Default for TaskSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let first = TaskSession::new();
        let second = TaskSession::new();
        assert_ne!(first.id(), second.id());

        first.store().write().await.add("only here", None).unwrap();

        assert_eq!(first.snapshot().await.len(), 1);
        assert!(second.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_observes_committed_state() {
        let session = TaskSession::new();
        let store = session.store();

        let id = store.write().await.add("a", None).unwrap();
        store
            .write()
            .await
            .update_status(&id, TaskStatus::Done)
            .unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_subscribe_through_session_handle() {
        let session = TaskSession::new();
        let mut rx = session.subscribe().await;

        session.store().write().await.add("task", None).unwrap();

        match rx.recv().await.unwrap() {
            TaskEvent::Added { description, .. } => assert_eq!(description, "task"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
