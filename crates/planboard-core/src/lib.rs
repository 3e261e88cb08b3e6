//! Planboard core: the task-tracking state an autonomous agent plans with.
//!
//! One session owns a mutable tree of tasks ([`task::TaskStore`]), mutations
//! flow through a single writer that publishes ordered change events
//! ([`task::TaskEvent`]), and any number of observers fold those events into
//! a disposable [`view::TaskView`] for rendering. The externally callable
//! mutation surface lives in the `planboard-tool` crate.

pub mod error;
pub mod session;
pub mod task;
pub mod view;

// Re-export common error type
pub use error::{ErrorKind, PlanboardError, Result};
pub use session::TaskSession;
