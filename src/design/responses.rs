//! Response DTOs for design API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Category, DesignEntry, GeneralConfig, Service};

/// Stored design calculation
#[derive(Debug, Clone, Serialize)]
pub struct DesignEntryResponse {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_basica: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_disponible: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_usada: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub porcentaje_ocupado: Decimal,
    pub opciones: serde_json::Value,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio_total: Decimal,
    pub correo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DesignEntry> for DesignEntryResponse {
    fn from(entry: DesignEntry) -> Self {
        Self {
            id: entry.id,
            area_total: entry.area_total,
            area_basica: entry.area_basica,
            area_disponible: entry.area_disponible,
            area_usada: entry.area_usada,
            porcentaje_ocupado: entry.porcentaje_ocupado,
            opciones: entry.opciones,
            precio_total: entry.precio_total,
            correo: entry.correo,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub emoji: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            emoji: c.emoji,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub id: i32,
    pub category_id: i32,
    pub name_en: String,
    pub name_es: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_min_usd: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub area_max_m2: Option<Decimal>,
    pub max_units: Option<i32>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        Self {
            id: s.id,
            category_id: s.category_id,
            name_en: s.name_en,
            name_es: s.name_es,
            price_min_usd: s.price_min_usd,
            area_max_m2: s.area_max_m2,
            max_units: s.max_units,
            notes: s.notes,
            image: s.image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralConfigResponse {
    pub key: String,
    pub value: String,
}

impl From<GeneralConfig> for GeneralConfigResponse {
    fn from(c: GeneralConfig) -> Self {
        Self {
            key: c.key,
            value: c.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_design_entry_serializes_numbers() {
        let response = DesignEntryResponse {
            id: 7,
            area_total: dec!(100),
            area_basica: dec!(50),
            area_disponible: dec!(50),
            area_usada: dec!(30),
            porcentaje_ocupado: dec!(60),
            opciones: json!([{ "area": 20, "price": 500 }]),
            precio_total: dec!(800),
            correo: None,
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        };

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["area_basica"], json!(50.0));
        assert_eq!(value["porcentaje_ocupado"], json!(60.0));
        assert_eq!(value["precio_total"], json!(800.0));
        assert_eq!(value["opciones"][0]["price"], json!(500));
        assert!(value["correo"].is_null());
    }

    #[test]
    fn test_service_optional_numbers() {
        let response = ServiceResponse {
            id: 1,
            category_id: 2,
            name_en: "Pool".into(),
            name_es: "Piscina".into(),
            price_min_usd: Some(dec!(1500.5)),
            area_max_m2: None,
            max_units: Some(1),
            notes: None,
            image: None,
        };

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["price_min_usd"], json!(1500.5));
        assert!(value["area_max_m2"].is_null());
    }
}
