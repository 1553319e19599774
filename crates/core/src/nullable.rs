//! Serde support for partial updates of nullable fields.
//!
//! A PATCH body distinguishes three states for a nullable column: the key is
//! absent (leave unchanged), present with `null` (clear), or present with a
//! value (set). Declare such fields as `Option<Option<T>>` with
//! `#[serde(default, deserialize_with = "nullable::deserialize")]`.

use serde::{Deserialize, Deserializer};

/// Deserialize a present key into `Some(value_or_none)`.
///
/// Combined with `#[serde(default)]`, an absent key stays `None`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
