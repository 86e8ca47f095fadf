//! HTTP handlers for the design calculator and catalog.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::queries;
use super::requests::{
    CreateDesignRequest, DesignListQuery, ReplaceServiceRequest, ServiceListQuery,
    UpdateServiceRequest,
};
use super::responses::{CategoryResponse, DesignEntryResponse, GeneralConfigResponse, ServiceResponse};
use super::services;

/// Design routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/diseno/", post(create_design).get(list_designs))
        .route("/diseno", post(create_design).get(list_designs))
        .route("/diseno/:id/", get(get_design))
        .route("/diseno/:id", get(get_design))
        .route("/categorias/", get(list_categories))
        .route("/categorias", get(list_categories))
        .route("/servicios/", get(list_services))
        .route("/servicios", get(list_services))
        .route(
            "/servicios/:id/",
            get(get_service)
                .put(replace_service)
                .patch(update_service)
                .delete(delete_service),
        )
        .route(
            "/servicios/:id",
            get(get_service)
                .put(replace_service)
                .patch(update_service)
                .delete(delete_service),
        )
        .route("/configuracion/", get(list_general_config))
        .route("/configuracion", get(list_general_config))
}

/// Calculate a design and store it
async fn create_design(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateDesignRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DesignEntryResponse>)> {
    let Json(request) = payload?;

    let entry =
        services::create_design_entry(&state.db, state.config.basic_area_ratio, request).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

async fn list_designs(
    State(state): State<AppState>,
    query: std::result::Result<Query<DesignListQuery>, QueryRejection>,
) -> Result<Json<Vec<DesignEntryResponse>>> {
    let Query(query) = query?;
    let (limit, offset) = query.window();
    let entries = queries::list_design_entries(&state.db, limit, offset).await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn get_design(
    State(state): State<AppState>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<DesignEntryResponse>> {
    let Path(id) = path?;
    let entry = queries::get_design_entry(&state.db, id).await?;
    Ok(Json(entry.into()))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = services::categories(&state.db, &state.cache).await?;
    Ok(Json(
        categories.iter().cloned().map(Into::into).collect(),
    ))
}

async fn list_services(
    State(state): State<AppState>,
    query: std::result::Result<Query<ServiceListQuery>, QueryRejection>,
) -> Result<Json<Vec<ServiceResponse>>> {
    let Query(query) = query?;
    let services = services::services(&state.db, &state.cache, query.category_id).await?;
    Ok(Json(services.iter().cloned().map(Into::into).collect()))
}

async fn get_service(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ServiceResponse>> {
    let Path(id) = path?;
    let service = queries::get_service(&state.db, id).await?;
    Ok(Json(service.into()))
}

async fn update_service(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<UpdateServiceRequest>, JsonRejection>,
) -> Result<Json<ServiceResponse>> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    let service = services::update_service(&state.db, &state.cache, id, &patch).await?;
    Ok(Json(service.into()))
}

async fn replace_service(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<ReplaceServiceRequest>, JsonRejection>,
) -> Result<Json<ServiceResponse>> {
    let Path(id) = path?;
    let Json(replace) = payload?;
    let service =
        services::update_service(&state.db, &state.cache, id, &replace.into()).await?;
    Ok(Json(service.into()))
}

async fn delete_service(
    State(state): State<AppState>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = path?;
    services::delete_service(&state.db, &state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_general_config(
    State(state): State<AppState>,
) -> Result<Json<Vec<GeneralConfigResponse>>> {
    let rows = services::general_config(&state.db, &state.cache).await?;
    Ok(Json(rows.iter().cloned().map(Into::into).collect()))
}
