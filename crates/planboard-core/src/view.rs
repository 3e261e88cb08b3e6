//! Read-only projection of the task tree, rebuilt from events.
//!
//! A `TaskView` is the observer half of the subsystem: it seeds itself from a
//! snapshot at subscribe time, folds each event as it arrives, and hands the
//! renderer a flattened, depth-annotated row list. The copy is disposable;
//! whenever it falls out of sync (a lagged subscriber, an unknown id) the
//! remedy is a fresh snapshot, never repair.

use crate::task::{Task, TaskEvent, TaskStatus};
use std::collections::HashMap;
use tracing::warn;

/// One renderable row: a task and its visual nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Number of ancestors, derived strictly from the `parent_id` chain.
    pub depth: usize,
    /// The projected task.
    pub task: Task,
}

/// A local, derived copy of one session's task tree.
///
/// Never the authoritative structure: the store owns task state, the view
/// only mirrors what the events describe.
#[derive(Debug, Default)]
pub struct TaskView {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskView {
    /// Creates an empty view (for subscribers that join before any mutation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the view from a store snapshot taken at subscribe time.
    pub fn from_snapshot(tasks: Vec<Task>) -> Self {
        let mut view = Self::new();
        view.reset_to(tasks);
        view
    }

    /// Folds one event into the local copy.
    pub fn apply(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Added {
                id,
                description,
                status,
                parent_id,
            } => {
                if self.index.contains_key(&id) {
                    // Stale or duplicated delivery; the store never reuses ids.
                    warn!(%id, "ignoring added event for known id");
                    return;
                }
                self.index.insert(id.clone(), self.tasks.len());
                self.tasks.push(Task {
                    id,
                    description,
                    status,
                    parent_id,
                    created_at: String::new(),
                });
            }
            TaskEvent::Updated { id, status } => match self.index.get(&id) {
                Some(&slot) => self.tasks[slot].status = status,
                None => warn!(%id, "ignoring status update for unknown id; view is stale"),
            },
            TaskEvent::Reset { tasks } => self.reset_to(tasks),
        }
    }

    /// Discards the local copy and replaces it wholesale.
    ///
    /// Used both for `Reset` events and for snapshot resynchronization after
    /// a subscriber lags.
    pub fn reset_to(&mut self, tasks: Vec<Task>) {
        self.index = tasks
            .iter()
            .enumerate()
            .map(|(slot, task)| (task.id.clone(), slot))
            .collect();
        self.tasks = tasks;
    }

    /// Returns the tree flattened in render order with nesting depths.
    ///
    /// Parents come before their children and siblings keep the authoritative
    /// order from `Added`/`Reset`. A row whose parent is missing from the
    /// view is rendered as a root rather than dropped.
    pub fn rows(&self) -> Vec<TaskRow> {
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
                        warn!(id = %task.id, "parent missing from view; rendering as root");
                    }
                    roots.push(slot);
                }
            }
        }

        let mut rows = Vec::with_capacity(self.tasks.len());
        let mut visited = vec![false; self.tasks.len()];
        let mut stack: Vec<(usize, usize)> = roots.into_iter().rev().map(|s| (s, 0)).collect();
        while let Some((slot, depth)) = stack.pop() {
            visited[slot] = true;
            rows.push(TaskRow {
                depth,
                task: self.tasks[slot].clone(),
            });
            stack.extend(children[slot].iter().rev().map(|&child| (child, depth + 1)));
        }

        // Anything unreachable from a root is a defect upstream; surface it
        // as a root row instead of silently losing the task.
        if rows.len() < self.tasks.len() {
            warn!(
                missing = self.tasks.len() - rows.len(),
                "tasks unreachable from roots in view"
            );
            for (slot, task) in self.tasks.iter().enumerate() {
                if !visited[slot] {
                    rows.push(TaskRow {
                        depth: 0,
                        task: task.clone(),
                    });
                }
            }
        }

        rows
    }

    /// The projected tasks in render order, without depth annotations.
    pub fn tasks(&self) -> Vec<Task> {
        self.rows().into_iter().map(|row| row.task).collect()
    }

    /// Looks up one projected task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&slot| &self.tasks[slot])
    }

    /// Current status of one projected task.
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.get(id).map(|task| task.status)
    }

    /// Number of projected tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the view holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
