//! Database models for the design calculator and its catalog.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use super::calculators::DesignCalculationResult;

/// Persisted design calculation from design_entries
#[derive(Debug, Clone, FromRow)]
pub struct DesignEntry {
    pub id: i64,
    pub area_total: Decimal,
    pub area_basica: Decimal,
    pub area_disponible: Decimal,
    pub area_usada: Decimal,
    pub porcentaje_ocupado: Decimal,
    pub opciones: serde_json::Value,
    pub precio_total: Decimal,
    pub correo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A design entry ready to be inserted
#[derive(Debug, Clone)]
pub struct NewDesignEntry {
    pub calculation: DesignCalculationResult,
    /// Options exactly as the client sent them
    pub opciones: serde_json::Value,
    pub correo: Option<String>,
}

/// Category from design_categories
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub emoji: Option<String>,
}

/// Service from design_services
#[derive(Debug, Clone, FromRow)]
pub struct Service {
    pub id: i32,
    pub category_id: i32,
    pub name_en: String,
    pub name_es: String,
    pub price_min_usd: Option<Decimal>,
    pub area_max_m2: Option<Decimal>,
    pub max_units: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

/// Key/value row from design_general_config
#[derive(Debug, Clone, FromRow)]
pub struct GeneralConfig {
    pub key: String,
    pub value: String,
}
