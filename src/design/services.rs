//! Design service functions with database access.
//!
//! Request validation and the compute-then-persist flow live here; catalog
//! reads go through the application cache.

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::error::{Result, ValidationError};

use super::calculators::{compute_with_ratio, DesignOption};
use super::models::{Category, DesignEntry, GeneralConfig, NewDesignEntry, Service};
use super::queries;
use super::requests::{CreateDesignRequest, UpdateServiceRequest};

const MISSING_DATA: &str = "Faltan datos";
const MAX_EMAIL_LEN: usize = 254;

/// Validate a request body and run the engine, without touching storage.
pub fn prepare_design_entry(
    basic_area_ratio: Decimal,
    request: CreateDesignRequest,
) -> std::result::Result<NewDesignEntry, ValidationError> {
    let CreateDesignRequest {
        area_total,
        opciones,
        correo,
    } = request;

    let (area_total, opciones) = match (area_total, opciones) {
        (Some(a), Some(o)) if !a.is_null() && !is_empty_options(&o) => (a, o),
        _ => return Err(ValidationError::invalid(MISSING_DATA)),
    };

    let area_total = parse_area_total(&area_total)?;
    let options = parse_options(&opciones)?;
    let correo = normalize_email(correo)?;

    let calculation = compute_with_ratio(basic_area_ratio, area_total, &options)?;

    Ok(NewDesignEntry {
        calculation,
        opciones,
        correo,
    })
}

/// Validate, compute and store one design entry.
pub async fn create_design_entry(
    pool: &PgPool,
    basic_area_ratio: Decimal,
    request: CreateDesignRequest,
) -> Result<DesignEntry> {
    let entry = prepare_design_entry(basic_area_ratio, request)?;
    let stored = queries::insert_design_entry(pool, &entry).await?;

    tracing::info!(
        id = stored.id,
        precio_total = %stored.precio_total,
        "Design entry created"
    );

    Ok(stored)
}

fn is_empty_options(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Parse the plot area from a JSON number or a numeric string.
pub fn parse_area_total(value: &Value) -> std::result::Result<Decimal, ValidationError> {
    let not_numeric = || ValidationError::invalid("area_total debe ser un número");

    match value {
        Value::Number(_) => serde_json::from_value::<Decimal>(value.clone()).map_err(|_| not_numeric()),
        Value::String(raw) => {
            let raw = raw.trim();
            raw.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(raw))
                .map_err(|_| not_numeric())
        }
        _ => Err(not_numeric()),
    }
}

/// Extract the engine inputs from the raw `opciones` payload.
pub fn parse_options(value: &Value) -> std::result::Result<Vec<DesignOption>, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::invalid("opciones debe ser una lista"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<DesignOption>(item.clone()).map_err(|_| {
                ValidationError::invalid(format!(
                    "La opción {} requiere 'area' y 'price' numéricos",
                    i + 1
                ))
            })
        })
        .collect()
}

/// Blank emails are treated as absent; anything else gets a basic shape check.
pub fn normalize_email(correo: Option<String>) -> std::result::Result<Option<String>, ValidationError> {
    let Some(correo) = correo else {
        return Ok(None);
    };

    let correo = correo.trim();
    if correo.is_empty() {
        return Ok(None);
    }

    if is_plausible_email(correo) {
        Ok(Some(correo.to_string()))
    } else {
        Err(ValidationError::invalid("Introduzca una dirección de correo electrónico válida"))
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// All categories, cached
pub async fn categories(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<Category>>> {
    if let Some(cached) = cache.get_categories().await {
        tracing::debug!("Cache HIT for categories");
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for categories");
    let categories = queries::list_categories(pool).await?;
    Ok(cache.put_categories(categories).await)
}

/// Services, optionally filtered by category, cached per filter
pub async fn services(
    pool: &PgPool,
    cache: &AppCache,
    category_id: Option<i32>,
) -> Result<Arc<Vec<Service>>> {
    // Taken before the query: a write in between moves readers to a new key
    let key = cache.services_key(category_id);

    if let Some(cached) = cache.get_services(&key).await {
        tracing::debug!("Cache HIT for {}", key);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for {}", key);
    let services = queries::list_services(pool, category_id).await?;
    Ok(cache.put_services(key, services).await)
}

/// General configuration rows, cached
pub async fn general_config(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<GeneralConfig>>> {
    if let Some(cached) = cache.get_general_config().await {
        tracing::debug!("Cache HIT for general config");
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for general config");
    let rows = queries::list_general_config(pool).await?;
    Ok(cache.put_general_config(rows).await)
}

/// Update (or replace) a service and drop stale listings
pub async fn update_service(
    pool: &PgPool,
    cache: &AppCache,
    id: i32,
    patch: &UpdateServiceRequest,
) -> Result<Service> {
    patch.validate()?;

    let service = queries::update_service(pool, id, patch).await?;
    cache.invalidate_services();

    tracing::info!(id = service.id, "Service updated");
    Ok(service)
}

/// Delete a service and drop stale listings
pub async fn delete_service(pool: &PgPool, cache: &AppCache, id: i32) -> Result<()> {
    queries::delete_service(pool, id).await?;
    cache.invalidate_services();
    Ok(())
}
