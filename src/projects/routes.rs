//! Project route handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;

use crate::error::Result;
use crate::AppState;

use super::models::{Project, ProjectImage, ProjectResponse};
use super::queries;

/// Project routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/", get(list))
        .route("/projects", get(list))
        .route("/projects/:id/", get(detail))
        .route("/projects/:id", get(detail))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = queries::list_projects(&state.db).await?;
    let ids: Vec<i32> = projects.iter().map(|p| p.id).collect();
    let images = queries::images_for(&state.db, &ids).await?;

    Ok(Json(attach_images(projects, images)))
}

async fn detail(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ProjectResponse>> {
    let Path(id) = path?;
    let project = queries::get_project(&state.db, id).await?;
    let images = queries::images_for(&state.db, &[id]).await?;

    Ok(Json(ProjectResponse::new(project, images)))
}

/// Group images under their project, keeping project order
fn attach_images(projects: Vec<Project>, images: Vec<ProjectImage>) -> Vec<ProjectResponse> {
    let mut by_project: HashMap<i32, Vec<ProjectImage>> = HashMap::new();
    for image in images {
        by_project.entry(image.project_id).or_default().push(image);
    }

    projects
        .into_iter()
        .map(|project| {
            let images = by_project.remove(&project.id).unwrap_or_default();
            ProjectResponse::new(project, images)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i32) -> Project {
        Project {
            id,
            name: format!("Casa {id}"),
            display_title: None,
            color: "#ffffff".into(),
            image: None,
            utilization: "Residencial".into(),
            services: "Diseño".into(),
            year: "2024".into(),
            category: "Casa".into(),
            kind: "Nueva".into(),
            size: "120 m²".into(),
            location: "Mérida".into(),
            status: "Terminado".into(),
            featured: false,
            description: None,
            features: None,
        }
    }

    fn image(id: i32, project_id: i32) -> ProjectImage {
        ProjectImage {
            id,
            project_id,
            image: format!("projects/extra_images/{id}.jpg"),
        }
    }

    #[test]
    fn test_attach_images_groups_by_project() {
        let result = attach_images(
            vec![project(2), project(1)],
            vec![image(10, 1), image(11, 2), image(12, 1)],
        );

        assert_eq!(result[0].id, 2);
        assert_eq!(result[0].images.len(), 1);
        assert_eq!(result[1].images.iter().map(|i| i.id).collect::<Vec<_>>(), vec![10, 12]);
    }

    #[test]
    fn test_project_without_images() {
        let result = attach_images(vec![project(5)], vec![]);
        assert!(result[0].images.is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_project_id_is_json_400() {
        use axum::http::{Method, StatusCode};

        use crate::test_support::{send_json, test_app};

        let (status, body) = send_json(test_app(), Method::GET, "/api/projects/abc/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
