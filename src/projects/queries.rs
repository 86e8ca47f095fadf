//! Database queries for projects

use sqlx::PgPool;

use crate::error::{AppError, Result};

use super::models::{Project, ProjectImage};

const PROJECT_COLUMNS: &str = r#"
    id, name, display_title, color, image, utilization, services, year,
    category, type, size, location, status, featured, description, features
"#;

/// Get all projects, newest first
pub async fn list_projects(pool: &PgPool) -> Result<Vec<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id DESC");
    let projects = sqlx::query_as::<_, Project>(&sql).fetch_all(pool).await?;

    Ok(projects)
}

/// Get a project by id
pub async fn get_project(pool: &PgPool, id: i32) -> Result<Project> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
    sqlx::query_as::<_, Project>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Get the gallery images of the given projects
pub async fn images_for(pool: &PgPool, project_ids: &[i32]) -> Result<Vec<ProjectImage>> {
    let images = sqlx::query_as::<_, ProjectImage>(
        r#"
        SELECT id, project_id, image
        FROM project_images
        WHERE project_id = ANY($1)
        ORDER BY project_id, id
        "#,
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await?;

    Ok(images)
}
