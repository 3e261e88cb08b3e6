//! The canonical task tree for one session.

use super::event::{EventChannel, TaskEvent};
use super::model::{NewTask, Task, TaskStatus};
use crate::error::{PlanboardError, Result};
use std::collections::HashMap;
use tracing::warn;

/// Maximum nesting depth accepted by `add`.
///
/// The tree has no business-level depth limit, but a runaway agent repeatedly
/// nesting under its own output would otherwise make every tree walk pay for
/// the pathology. 64 levels is far beyond any legible plan.
pub const MAX_DEPTH: usize = 64;

/// The single writer of task state for one session.
///
/// Tasks live in a flat arena in insertion order; the tree shape is a
/// parent-reference relation over that arena and child lists are rebuilt on
/// demand. The store owns the event channel and publishes exactly one event
/// per accepted mutation, while the mutation is still exclusive, so
/// subscribers observe events in acceptance order.
///
/// Invariants held after every accepted mutation:
/// - ids are unique within the store
/// - every `parent_id` resolves to a task in the same store
/// - the parent relation is acyclic
/// - sibling insertion order is stable; status updates never move a task
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    events: EventChannel,
}

impl TaskStore {
    /// Creates an empty store with the default event capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with a custom per-subscriber event capacity.
    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
            events: EventChannel::new(capacity),
        }
    }

    /// Appends a new task and publishes an `Added` event.
    ///
    /// The task starts as `NotStarted` with a freshly minted id and is placed
    /// after its siblings (or at the root when `parent_id` is `None`).
    ///
    /// # Errors
    ///
    /// `InvalidParent` when the parent id is unknown or its chain is already
    /// `MAX_DEPTH` deep.
    pub fn add(&mut self, description: &str, parent_id: Option<&str>) -> Result<String> {
        if let Some(parent) = parent_id {
            if !self.index.contains_key(parent) {
                return Err(PlanboardError::invalid_parent(parent));
            }
            if self.depth_of(parent) >= MAX_DEPTH {
                return Err(PlanboardError::invalid_parent(format!(
                    "{parent} (nesting deeper than {MAX_DEPTH} levels)"
                )));
            }
        }

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            status: TaskStatus::NotStarted,
            parent_id: parent_id.map(str::to_string),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let id = task.id.clone();
        let event = TaskEvent::Added {
            id: id.clone(),
            description: task.description.clone(),
            status: task.status,
            parent_id: task.parent_id.clone(),
        };

        self.index.insert(id.clone(), self.tasks.len());
        self.tasks.push(task);
        self.events.publish(event);

        Ok(id)
    }

    /// Sets a task's status and publishes an `Updated` event.
    ///
    /// All transitions are allowed, including backward ones (a reopened task),
    /// and setting the current status again succeeds trivially. Returns the
    /// new status so callers can echo it without re-reading the store.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not in the store.
    pub fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<TaskStatus> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| PlanboardError::not_found(id))?;
        self.tasks[slot].status = status;

        self.events.publish(TaskEvent::Updated {
            id: id.to_string(),
            status,
        });
        Ok(status)
    }

    /// Discards the current tree and rebuilds it from `entries` in one atomic
    /// step, publishing a single `Reset` event with the full new snapshot.
    ///
    /// Parent references are positional and must point at a strictly earlier
    /// entry in the batch, which makes acyclicity structural. Returns the
    /// fresh ids in batch order.
    ///
    /// # Errors
    ///
    /// `InvalidParent` when any entry references itself, a later entry, or an
    /// index out of range. The previous tree is left untouched.
    pub fn replace_all(&mut self, entries: &[NewTask]) -> Result<Vec<String>> {
        // Validate the whole batch before touching any state.
        for (position, entry) in entries.iter().enumerate() {
            if let Some(parent) = entry.parent {
                if parent >= position {
                    return Err(PlanboardError::invalid_parent(format!(
                        "entry {position} references batch index {parent}"
                    )));
                }
            }
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let mut ids: Vec<String> = Vec::with_capacity(entries.len());
        let mut tasks: Vec<Task> = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = uuid::Uuid::new_v4().to_string();
            tasks.push(Task {
                id: id.clone(),
                description: entry.description.clone(),
                status: entry.status.unwrap_or_default(),
                parent_id: entry.parent.map(|p| ids[p].clone()),
                created_at: created_at.clone(),
            });
            ids.push(id);
        }

        self.tasks = tasks;
        self.index = self
            .tasks
            .iter()
            .enumerate()
            .map(|(slot, task)| (task.id.clone(), slot))
            .collect();

        self.events.publish(TaskEvent::Reset {
            tasks: self.snapshot(),
        });
        Ok(ids)
    }

    /// Returns the current tree in stable render order: parents before their
    /// children, siblings in insertion order. Never fails.
    pub fn snapshot(&self) -> Vec<Task> {
        let mut roots: Vec<usize> = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.tasks.len()];
        for (slot, task) in self.tasks.iter().enumerate() {
            match task
                .parent_id
                .as_deref()
                .and_then(|parent| self.index.get(parent))
            {
                Some(&parent_slot) => children[parent_slot].push(slot),
                None => {
                    if task.parent_id.is_some() {
                        // Defect: validation should make this unreachable.
                        warn!(id = %task.id, "task has dangling parent; rendering as root");
                    }
                    roots.push(slot);
                }
            }
        }

        let mut ordered = Vec::with_capacity(self.tasks.len());
        let mut visited = vec![false; self.tasks.len()];
        let mut stack: Vec<usize> = roots.into_iter().rev().collect();
        while let Some(slot) = stack.pop() {
            visited[slot] = true;
            ordered.push(self.tasks[slot].clone());
            stack.extend(children[slot].iter().rev().copied());
        }

        // Defect guard: a node unreachable from any root would mean a cycle
        // slipped past validation. Surface it instead of dropping tasks.
        if ordered.len() < self.tasks.len() {
            warn!(
                missing = self.tasks.len() - ordered.len(),
                "tasks unreachable from roots; appending in insertion order"
            );
            for (slot, task) in self.tasks.iter().enumerate() {
                if !visited[slot] {
                    ordered.push(task.clone());
                }
            }
        }

        ordered
    }

    /// Registers a new event subscriber.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    /// Looks up a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&slot| &self.tasks[slot])
    }

    /// Number of tasks in the store.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of ancestors above `id`, bounded by the store size.
    fn depth_of(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.index.get(id).copied();
        while let Some(slot) = current {
            depth += 1;
            if depth > self.tasks.len() {
                // Defect: a cycle would loop here forever without this bound.
                warn!(id, "parent chain longer than store size");
                break;
            }
            current = self.tasks[slot]
                .parent_id
                .as_deref()
                .and_then(|parent| self.index.get(parent))
                .copied();
        }
        depth
    }
}
