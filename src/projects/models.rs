//! Project models

use serde::Serialize;
use sqlx::FromRow;

/// Project from projects
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub display_title: Option<String>,
    pub color: String,
    pub image: Option<String>,
    pub utilization: String,
    pub services: String,
    pub year: String,
    pub category: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub size: String,
    pub location: String,
    pub status: String,
    pub featured: bool,
    pub description: Option<String>,
    pub features: Option<serde_json::Value>,
}

/// Extra image attached to a project
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectImage {
    pub id: i32,
    pub project_id: i32,
    pub image: String,
}

/// Project together with its gallery
#[derive(Debug, Clone, Serialize)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    pub display_title: Option<String>,
    pub color: String,
    pub image: Option<String>,
    pub utilization: String,
    pub services: String,
    pub year: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub location: String,
    pub status: String,
    pub featured: bool,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<ProjectImage>,
}

impl ProjectResponse {
    pub fn new(project: Project, images: Vec<ProjectImage>) -> Self {
        Self {
            features: feature_list(project.features.as_ref()),
            id: project.id,
            name: project.name,
            display_title: project.display_title,
            color: project.color,
            image: project.image,
            utilization: project.utilization,
            services: project.services,
            year: project.year,
            category: project.category,
            kind: project.kind,
            size: project.size,
            location: project.location,
            status: project.status,
            featured: project.featured,
            description: project.description,
            images,
        }
    }
}

/// Features are stored as a JSON list of strings; anything else is dropped.
fn feature_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_list() {
        assert_eq!(
            feature_list(Some(&json!(["Terraza", 3, "Jardín"]))),
            vec!["Terraza".to_string(), "Jardín".to_string()]
        );
        assert!(feature_list(Some(&json!({ "a": 1 }))).is_empty());
        assert!(feature_list(None).is_empty());
    }
}
