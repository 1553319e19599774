//! Activity log model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::activity::ActivityType;
use taskboard_core::nullable;
use taskboard_core::types::{DbId, Timestamp};

/// A row from the `activities` table.
#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub id: DbId,
    pub user_id: DbId,
    pub task_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub activity_type: ActivityType,
    pub message: String,
    #[sqlx(json)]
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for recording an activity. The acting user is supplied separately.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActivity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub message: String,
    pub task_id: Option<DbId>,
    pub meta: Option<serde_json::Value>,
}

/// DTO for editing an activity. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateActivity {
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub message: Option<String>,
    pub user_id: Option<DbId>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub task_id: Option<Option<DbId>>,
    pub meta: Option<serde_json::Value>,
}

/// Query parameters accepted by the activity list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityListParams {
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
