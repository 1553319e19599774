//! Request extractors shared by protected handlers.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.

pub mod auth;
