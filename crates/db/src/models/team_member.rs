//! Team member model and DTOs.

use serde::Deserialize;
use sqlx::FromRow;
use taskboard_core::nullable;
use taskboard_core::team::{MemberStatus, TeamRole};
use taskboard_core::types::{DbId, Timestamp};

/// A team member row joined with its project's name.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMember {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: TeamRole,
    pub department: String,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: MemberStatus,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a team member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamMember {
    pub name: String,
    pub email: String,
    pub role: Option<TeamRole>,
    pub department: Option<String>,
    pub project_id: Option<DbId>,
    pub status: Option<MemberStatus>,
    pub total_tasks: Option<i64>,
    pub completed_tasks: Option<i64>,
}

/// DTO for updating a team member. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeamMember {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<TeamRole>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub project_id: Option<Option<DbId>>,
    pub status: Option<MemberStatus>,
    pub total_tasks: Option<i64>,
    pub completed_tasks: Option<i64>,
}

/// Query parameters accepted by the team member list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMemberListParams {
    pub role: Option<TeamRole>,
    pub department: Option<String>,
    pub status: Option<MemberStatus>,
    pub project: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
