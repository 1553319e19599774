//! Row models and request DTOs, one module per table.

pub mod activity;
pub mod project;
pub mod session;
pub mod task;
pub mod team_member;
pub mod user;
