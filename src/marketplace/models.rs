//! Marketplace models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Square feet in one square metre
pub const SQFT_PER_M2: Decimal = dec!(10.7639);

/// House design product from marketplace_products
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub area_m2: Decimal,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub garage: i32,
    pub price: Decimal,
    pub architectural_style: String,
    pub main_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Built area in square feet, rounded to two decimals
    pub fn area_sqft(&self) -> Decimal {
        area_sqft(self.area_m2)
    }
}

pub fn area_sqft(area_m2: Decimal) -> Decimal {
    area_m2
        .checked_mul(SQFT_PER_M2)
        .map(|sqft| sqft.round_dp(2))
        .unwrap_or(Decimal::MAX)
}

/// Gallery image of a product
#[derive(Debug, Clone, FromRow)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image: String,
    pub sort_order: i32,
}

/// Raw filter definition from marketplace_filter_configs
#[derive(Debug, Clone, FromRow)]
pub struct FilterConfigRow {
    pub name: String,
    pub key: String,
    pub options: Value,
}

/// One selectable option of a marketplace filter. `params` are the query
/// parameters the option applies to the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Filter definition as served to the front end
#[derive(Debug, Clone, Serialize)]
pub struct FilterConfig {
    pub name: String,
    pub key: String,
    pub options: Vec<FilterOption>,
}

impl From<FilterConfigRow> for FilterConfig {
    /// Options that are not `{label, params}` objects are skipped
    fn from(row: FilterConfigRow) -> Self {
        let options = match row.options {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name: row.name,
            key: row.key,
            options,
        }
    }
}
