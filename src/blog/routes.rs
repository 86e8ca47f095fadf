//! Blog route handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::models::{
    BlogPost, InteractionEvent, InteractionQuery, InteractionSummary, RecordInteractionRequest,
};
use super::queries;

/// Blog routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blogs/", get(list))
        .route("/blogs", get(list))
        .route("/blogs/featured/", get(featured))
        .route("/blogs/featured", get(featured))
        .route("/blogs/:id/", get(detail))
        .route("/blogs/:id", get(detail))
        .route(
            "/blogs/:id/interactions/",
            get(interactions).post(record_interaction),
        )
        .route(
            "/blogs/:id/interactions",
            get(interactions).post(record_interaction),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    Ok(Json(queries::list_posts(&state.db).await?))
}

async fn featured(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>> {
    Ok(Json(queries::featured_posts(&state.db).await?))
}

async fn detail(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<BlogPost>> {
    let Path(id) = path?;
    Ok(Json(queries::get_post(&state.db, id).await?))
}

/// Derived like/favorite counts for a post
async fn interactions(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    query: std::result::Result<Query<InteractionQuery>, QueryRejection>,
) -> Result<Json<InteractionSummary>> {
    let Path(id) = path?;
    let Query(query) = query?;

    // 404 for unknown posts rather than zero counts
    queries::get_post(&state.db, id).await?;

    let counts = queries::interaction_counts(&state.db, id).await?;
    let visitor = match query.visitor_id {
        Some(visitor_id) => queries::visitor_state(&state.db, id, visitor_id).await?,
        None => None,
    };

    Ok(Json(InteractionSummary {
        blog_id: id,
        counts,
        visitor,
    }))
}

/// Append the visitor's new like/favorite state
async fn record_interaction(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<RecordInteractionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InteractionEvent>)> {
    let Path(id) = path?;
    let Json(request) = payload?;
    request.validate()?;

    let event = queries::record_interaction(
        &state.db,
        id,
        request.visitor_id,
        request.liked,
        request.favorited,
    )
    .await?;

    tracing::debug!(
        blog_id = id,
        visitor_id = %event.visitor_id,
        liked = event.liked,
        favorited = event.favorited,
        "Blog interaction recorded"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support::{send_json, test_app};

    async fn post_interaction(body: String) -> StatusCode {
        test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/blogs/1/interactions/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_nil_visitor_is_400() {
        let body = json!({
            "visitor_id": "00000000-0000-0000-0000-000000000000",
            "liked": true
        });
        assert_eq!(post_interaction(body.to_string()).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_visitor_is_400() {
        let body = json!({ "visitor_id": "someone", "liked": true });
        assert_eq!(post_interaction(body.to_string()).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_post_id_is_json_400() {
        let (status, body) = send_json(test_app(), Method::GET, "/api/blogs/abc/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_visitor_query_is_json_400() {
        let (status, body) = send_json(
            test_app(),
            Method::GET,
            "/api/blogs/1/interactions/?visitor_id=nobody",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
