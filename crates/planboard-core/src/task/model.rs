//! Task domain model.
//!
//! This module contains the core Task entity and value objects that represent
//! a unit of trackable work in the agent's current plan.

use serde::{Deserialize, Serialize};

/// Represents the current status of a tracked task.
///
/// Any status may transition to any other: agents legitimately reopen tasks,
/// so no forward-only lifecycle is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task has been planned but work has not begun.
    NotStarted,
    /// The task is currently being worked on.
    InProgress,
    /// The task is complete.
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A single unit of trackable work.
///
/// Tasks form a tree through `parent_id` references over a flat collection;
/// there are no nested containers. All five fields round-trip losslessly
/// through serde so an external collaborator can persist and rebuild an
/// equivalent store via a bulk `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID format), assigned at creation, immutable.
    pub id: String,
    /// Human-readable description of the work.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Id of the parent task, if this task is nested under one.
    pub parent_id: Option<String>,
    /// Timestamp when the task was created (ISO 8601 format). Used only for
    /// stable ordering and debugging, never for business logic.
    pub created_at: String,
}

/// One entry of a bulk `create` request.
///
/// The parent reference is positional: an index into the same batch, which
/// must point at a strictly earlier entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Description of the task to create.
    pub description: String,
    /// Initial status; defaults to `NotStarted` when omitted.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Index of the parent entry within this batch, if nested.
    #[serde(default)]
    pub parent: Option<usize>,
}

impl NewTask {
    /// Creates a root-level entry with the default status.
    pub fn root(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: None,
            parent: None,
        }
    }

    /// Creates an entry nested under the batch entry at `parent`.
    pub fn child_of(description: impl Into<String>, parent: usize) -> Self {
        Self {
            description: description.into(),
            status: None,
            parent: Some(parent),
        }
    }

    /// Sets the initial status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::NotStarted).unwrap(),
            r#""not_started""#
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Done).unwrap(),
            r#""done""#
        );
    }

    #[test]
    fn test_task_round_trips_all_fields() {
        let task = Task {
            id: "6f9eff0c-3bf9-4c6a-9a6e-0d9b3a1f2c45".to_string(),
            description: "write tests".to_string(),
            status: TaskStatus::InProgress,
            parent_id: Some("parent-id".to_string()),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_new_task_defaults() {
        let entry: NewTask = serde_json::from_str(r#"{"description":"a"}"#).unwrap();
        assert_eq!(entry.description, "a");
        assert_eq!(entry.status, None);
        assert_eq!(entry.parent, None);
    }
}
