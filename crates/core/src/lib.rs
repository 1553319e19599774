//! Domain types and pure logic for the taskboard backend.
//!
//! This crate has no database or HTTP dependencies. Everything here operates
//! on values passed in by the caller so it can be unit-tested in isolation.

pub mod activity;
pub mod choice;
pub mod error;
pub mod listing;
pub mod nullable;
pub mod progress;
pub mod project;
pub mod task;
pub mod team;
pub mod types;
pub mod validation;
