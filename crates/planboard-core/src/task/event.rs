//! Task change events and their broadcast channel.

use super::model::{Task, TaskStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default bounded capacity of the per-subscriber event queue.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A state-change notification derived from one accepted mutation.
///
/// Events are published in mutation acceptance order with no coalescing:
/// consecutive `Updated` events for the same task are delivered individually.
/// `Reset` carries the full new tree so any observer can resynchronize from
/// it without a snapshot pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// A task was appended to the tree.
    Added {
        id: String,
        description: String,
        status: TaskStatus,
        #[serde(default)]
        parent_id: Option<String>,
    },
    /// One task's status changed.
    Updated { id: String, status: TaskStatus },
    /// The whole tree was replaced in one atomic step.
    Reset { tasks: Vec<Task> },
}

/// Bounded fan-out channel for task events.
///
/// Each subscriber gets its own queue; publishing never blocks. A subscriber
/// that falls a full capacity behind observes `RecvError::Lagged` and is
/// expected to resynchronize from a fresh snapshot rather than replay the
/// missed events.
#[derive(Debug)]
pub struct EventChannel {
    sender: broadcast::Sender<TaskEvent>,
}

impl EventChannel {
    /// Creates a channel with the given per-subscriber queue capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Registers a new subscriber. Only events published after this call are
    /// delivered; late joiners resynchronize via a snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to every live subscriber.
    ///
    /// Zero subscribers is not an error: the store's state is authoritative
    /// whether or not anyone is watching.
    pub fn publish(&self, event: TaskEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("task event published with no live subscribers");
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
