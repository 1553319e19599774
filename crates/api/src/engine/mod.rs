//! Database-backed drivers for the pure rules in `taskboard_core`.
//!
//! - [`project_status`] -- loads a project's tasks, applies the completion
//!   guard before an update and reconciles the stored status afterwards.

pub mod project_status;
