//! Keeps a project's stored status consistent with its task progress.

use taskboard_core::progress::{compute_progress, guard_completion, reconcile_status, ProjectWrite};
use taskboard_core::project::ProjectStatus;
use taskboard_core::types::DbId;
use taskboard_db::models::project::Project;
use taskboard_db::repositories::{ProjectRepo, TaskRepo};
use taskboard_db::DbPool;

use crate::error::AppResult;

/// Current progress of a project, from the tasks it has right now.
pub async fn project_progress(pool: &DbPool, project_id: DbId) -> Result<f64, sqlx::Error> {
    let weights = TaskRepo::weights_for_project(pool, project_id).await?;
    Ok(compute_progress(&weights))
}

/// Reject an update that would mark an unfinished project `Completed`.
///
/// Runs before anything is written.
pub async fn check_completion(
    pool: &DbPool,
    project_id: DbId,
    requested: Option<ProjectStatus>,
) -> AppResult<()> {
    if requested != Some(ProjectStatus::Completed) {
        return Ok(());
    }
    let progress = project_progress(pool, project_id).await?;
    guard_completion(requested, Some(progress))?;
    Ok(())
}

/// Correct the stored status of a just-written project if it disagrees
/// with the project's progress.
///
/// Returns the project as stored after any correction. Callers treat an
/// error as non-fatal: the primary write has already been committed.
pub async fn reconcile(
    pool: &DbPool,
    project: Project,
    write: ProjectWrite,
) -> Result<Project, sqlx::Error> {
    let progress = project_progress(pool, project.id).await?;

    let Some(next) = reconcile_status(write, project.status, progress) else {
        return Ok(project);
    };

    tracing::debug!(
        project_id = project.id,
        from = %project.status,
        to = %next,
        progress,
        "Reconciling project status",
    );

    // The project may have been deleted concurrently; keep what we have.
    Ok(ProjectRepo::set_status(pool, project.id, next)
        .await?
        .unwrap_or(project))
}
