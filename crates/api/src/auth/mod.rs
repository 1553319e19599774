//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token signing plus refresh-token helpers.

pub mod jwt;
pub mod password;
