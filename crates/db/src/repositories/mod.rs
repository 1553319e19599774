//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

use sqlx::{QueryBuilder, Sqlite};
use taskboard_core::listing::{clamp_limit, clamp_offset, SortOrder, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

pub mod activity_repo;
pub mod project_repo;
pub mod session_repo;
pub mod task_repo;
pub mod team_member_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use team_member_repo::TeamMemberRepo;
pub use user_repo::UserRepo;

/// Append `ORDER BY`, `LIMIT` and `OFFSET` to a list query.
///
/// `alias` qualifies the sort column (e.g. `"t."`). Rows sharing a sort key
/// are ordered by `id` in the same direction so pages are stable.
pub(crate) fn push_order_and_page(
    qb: &mut QueryBuilder<'_, Sqlite>,
    alias: &str,
    order: SortOrder,
    limit: Option<i64>,
    offset: Option<i64>,
) {
    let dir = order.direction();
    qb.push(format!(
        " ORDER BY {alias}{field} {dir}, {alias}id {dir}",
        field = order.field
    ));
    qb.push(" LIMIT ")
        .push_bind(clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT));
    qb.push(" OFFSET ").push_bind(clamp_offset(offset));
}

/// Append a parenthesised `col LIKE pattern OR ...` group over `columns`.
pub(crate) fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, columns: &[&str], pattern: &str) {
    qb.push("(");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("{column} LIKE "))
            .push_bind(pattern.to_string())
            .push(" ESCAPE '\\'");
    }
    qb.push(")");
}
