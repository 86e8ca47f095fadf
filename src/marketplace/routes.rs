//! Marketplace route handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, MethodRouter},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::models::FilterConfig;
use super::requests::{
    CreateProductRequest, FavoritesQuery, ProductListQuery, ToggleFavoriteRequest,
    UpdateProductRequest,
};
use super::responses::{FavoriteResponse, ProductPage, ProductResponse};
use super::services;

/// Marketplace routes, mounted under `/api`. The catalog answers both as
/// `/marketplace` and as `/products`.
pub fn router() -> Router<AppState> {
    ["/marketplace", "/products"]
        .into_iter()
        .fold(Router::new(), |router, prefix| {
            let router = both(router, prefix.to_string(), get(list).post(create));
            let router = both(router, format!("{prefix}/filters"), get(filters));
            let router = both(router, format!("{prefix}/favorites"), get(favorites));
            let router = both(
                router,
                format!("{prefix}/:id"),
                get(detail).patch(update).delete(remove),
            );
            both(
                router,
                format!("{prefix}/:id/toggle_favorite"),
                post(toggle_favorite),
            )
        })
}

/// Register a route with and without the trailing slash
fn both(
    router: Router<AppState>,
    path: String,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(&format!("{path}/"), method_router.clone())
        .route(&path, method_router)
}

async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductListQuery>, QueryRejection>,
) -> Result<Json<ProductPage>> {
    let Query(query) = query?;
    Ok(Json(services::list_products(&state.db, query).await?))
}

async fn detail(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ProductResponse>> {
    let Path(id) = path?;
    Ok(Json(services::product_detail(&state.db, id).await?))
}

async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let Json(request) = payload?;
    let product = services::create_product(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    Ok(Json(services::update_product(&state.db, id, patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = path?;
    services::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn filters(State(state): State<AppState>) -> Result<Json<Vec<FilterConfig>>> {
    let configs = services::filter_configs(&state.db, &state.cache).await?;
    Ok(Json(configs.as_ref().clone()))
}

async fn favorites(
    State(state): State<AppState>,
    query: std::result::Result<Query<FavoritesQuery>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>> {
    let Query(query) = query?;
    Ok(Json(services::favorite_products(&state.db, query.visitor_id).await?))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<ToggleFavoriteRequest>, JsonRejection>,
) -> Result<Json<FavoriteResponse>> {
    let Path(id) = path?;
    let Json(request) = payload?;
    Ok(Json(
        services::toggle_favorite(&state.db, id, request.visitor_id).await?,
    ))
}
