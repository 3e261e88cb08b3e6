//! The mutation contract: the externally callable surface an agent invokes
//! to manage its plan.
//!
//! Three actions map one-to-one onto the store operations: `add`,
//! `update_status`, and `create` (bulk replace). The tool performs shape
//! validation at the boundary - non-empty descriptions, well-formed ids -
//! before delegating, so the store only ever sees structurally sound
//! requests. Every call is synchronous from the caller's perspective: it
//! observes either a committed change (whose event has already been
//! published) or a rejection with no state change.

use planboard_core::error::{PlanboardError, Result};
use planboard_core::session::TaskSession;
use planboard_core::task::{NewTask, Task, TaskStatus, TaskStore};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A request to the task tool, tagged by action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToolRequest {
    /// Append one task, optionally nested under an existing one.
    Add {
        description: String,
        #[serde(default)]
        parent_id: Option<String>,
    },
    /// Change one task's status.
    UpdateStatus { id: String, status: TaskStatus },
    /// Replace the whole plan with a new batch.
    Create { tasks: Vec<NewTask> },
}

/// A successful tool outcome, tagged by result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ToolResponse {
    /// The id of the newly appended task.
    Added { id: String },
    /// The updated task's id and its (possibly unchanged) status.
    Updated { id: String, status: TaskStatus },
    /// The full new plan in render order.
    Created { tasks: Vec<Task> },
}

/// A structured failure, classified by kind for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub kind: planboard_core::ErrorKind,
    pub message: String,
}

impl From<PlanboardError> for ToolFailure {
    fn from(err: PlanboardError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The task tool bound to one session's store handle.
#[derive(Debug, Clone)]
pub struct TaskTool {
    store: Arc<RwLock<TaskStore>>,
}

impl TaskTool {
    /// Binds the tool to a shared store handle.
    pub fn new(store: Arc<RwLock<TaskStore>>) -> Self {
        Self { store }
    }

    /// Binds the tool to a session.
    pub fn for_session(session: &TaskSession) -> Self {
        Self::new(session.store())
    }

    /// Handles one typed request.
    ///
    /// Boundary validation happens before the store is touched, so a rejected
    /// request - whatever the reason - leaves the tree unchanged.
    pub async fn handle(&self, request: ToolRequest) -> Result<ToolResponse> {
        match request {
            ToolRequest::Add {
                description,
                parent_id,
            } => {
                let description = validated_description(&description)?;
                if let Some(parent) = parent_id.as_deref() {
                    validated_id(parent)?;
                }

                let mut store = self.store.write().await;
                let id = store.add(description, parent_id.as_deref())?;
                debug!(%id, "task added via tool");
                Ok(ToolResponse::Added { id })
            }
            ToolRequest::UpdateStatus { id, status } => {
                validated_id(&id)?;

                let mut store = self.store.write().await;
                let status = store.update_status(&id, status)?;
                debug!(%id, ?status, "task status updated via tool");
                Ok(ToolResponse::Updated { id, status })
            }
            ToolRequest::Create { tasks } => {
                // Validate every entry up front so a bad description leaves
                // the previous tree intact, same as a bad parent reference.
                let entries: Vec<NewTask> = tasks
                    .into_iter()
                    .map(|entry| {
                        Ok(NewTask {
                            description: validated_description(&entry.description)?.to_string(),
                            status: entry.status,
                            parent: entry.parent,
                        })
                    })
                    .collect::<Result<_>>()?;

                let mut store = self.store.write().await;
                let ids = store.replace_all(&entries)?;
                debug!(count = ids.len(), "plan replaced via tool");
                Ok(ToolResponse::Created {
                    tasks: store.snapshot(),
                })
            }
        }
    }

    /// The wire surface: takes a JSON request, returns a JSON success payload
    /// or a failure envelope. Parse failures are reported as
    /// `malformed_input`; nothing on this path panics.
    pub async fn dispatch(&self, input: Value) -> Value {
        let request: ToolRequest = match serde_json::from_value(input) {
            Ok(request) => request,
            Err(err) => {
                return failure_payload(&PlanboardError::malformed(err.to_string()).into());
            }
        };

        match self.handle(request).await {
            Ok(response) => json!(response),
            Err(err) => failure_payload(&err.into()),
        }
    }
}

fn failure_payload(failure: &ToolFailure) -> Value {
    json!({
        "result": "error",
        "kind": failure.kind,
        "message": failure.message,
    })
}

/// Trims the description and rejects empty or whitespace-only text.
fn validated_description(raw: &str) -> Result<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlanboardError::EmptyDescription);
    }
    Ok(trimmed)
}

/// Rejects identifiers that are not UUID-shaped. Ids are minted by the store,
/// so anything else can only be a malformed request, not a missing task.
fn validated_id(id: &str) -> Result<()> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| PlanboardError::malformed(format!("'{id}' is not a valid task id")))
}
