//! Task domain module.
//!
//! This module contains the task tree owned by a session: the domain model,
//! the single-writer store that enforces its invariants, and the broadcast
//! channel carrying change events to observers.
//!
//! # Module Structure
//!
//! - `model`: Core task domain models (`Task`, `TaskStatus`, `NewTask`)
//! - `store`: The canonical task tree (`TaskStore`)
//! - `event`: Change notifications (`TaskEvent`, `EventChannel`)

mod event;
mod model;
mod store;

// Re-export public API
pub use event::{DEFAULT_EVENT_CAPACITY, EventChannel, TaskEvent};
pub use model::{NewTask, Task, TaskStatus};
pub use store::{MAX_DEPTH, TaskStore};
