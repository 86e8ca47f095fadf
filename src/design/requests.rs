//! Request DTOs for design API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ValidationError;

/// Request to calculate and store a design.
///
/// Fields are kept loose so that missing and malformed values can be told
/// apart and reported with a 400 instead of a generic body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateDesignRequest {
    #[serde(default)]
    pub area_total: Option<Value>,
    #[serde(default)]
    pub opciones: Option<Value>,
    #[serde(default)]
    pub correo: Option<String>,
}

/// Query parameters for listing stored designs
#[derive(Debug, Deserialize)]
pub struct DesignListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub const MAX_LIST_LIMIT: i64 = 200;

impl DesignListQuery {
    /// Clamp paging values into a sane window
    pub fn window(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_LIST_LIMIT), self.offset.max(0))
    }
}

/// Query parameters for listing services
#[derive(Debug, Default, Deserialize)]
pub struct ServiceListQuery {
    #[serde(default)]
    pub category_id: Option<i32>,
}

/// Partial update of a service. Absent fields are left unchanged; the
/// nullable columns are cleared by an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_es: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub price_min_usd: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub area_max_m2: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_units: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
}

impl UpdateServiceRequest {
    /// Names are required columns, so a present name must not be blank
    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = |name: &Option<String>| name.as_deref().is_some_and(|n| n.trim().is_empty());

        if blank(&self.name_en) || blank(&self.name_es) {
            return Err(ValidationError::invalid("name_en y name_es no pueden estar vacíos"));
        }
        Ok(())
    }
}

/// Full replacement of a service (PUT). Omitted nullable fields become null.
#[derive(Debug, Deserialize)]
pub struct ReplaceServiceRequest {
    pub category_id: i32,
    pub name_en: String,
    pub name_es: String,
    #[serde(default)]
    pub price_min_usd: Option<Decimal>,
    #[serde(default)]
    pub area_max_m2: Option<Decimal>,
    #[serde(default)]
    pub max_units: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<ReplaceServiceRequest> for UpdateServiceRequest {
    fn from(replace: ReplaceServiceRequest) -> Self {
        Self {
            category_id: Some(replace.category_id),
            name_en: Some(replace.name_en),
            name_es: Some(replace.name_es),
            price_min_usd: Some(replace.price_min_usd),
            area_max_m2: Some(replace.area_max_m2),
            max_units: Some(replace.max_units),
            notes: Some(replace.notes),
            image: Some(replace.image),
        }
    }
}

/// Deserialize a present field into `Some`, keeping `null` as `Some(None)`.
/// Paired with `#[serde(default)]` an absent field stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_window_clamps() {
        let q = DesignListQuery { limit: 10_000, offset: -3 };
        assert_eq!(q.window(), (MAX_LIST_LIMIT, 0));

        let q = DesignListQuery { limit: 0, offset: 20 };
        assert_eq!(q.window(), (1, 20));
    }

    #[test]
    fn test_create_request_accepts_missing_fields() {
        let req: CreateDesignRequest = serde_json::from_str("{}").unwrap();
        assert!(req.area_total.is_none());
        assert!(req.opciones.is_none());
        assert!(req.correo.is_none());
    }

    #[test]
    fn test_update_tells_absent_from_null() {
        let patch: UpdateServiceRequest = serde_json::from_value(serde_json::json!({
            "notes": null,
            "max_units": 3
        }))
        .unwrap();

        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.max_units, Some(Some(3)));
        assert_eq!(patch.image, None);
        assert_eq!(patch.price_min_usd, None);
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let patch: UpdateServiceRequest =
            serde_json::from_value(serde_json::json!({ "name_es": "  " })).unwrap();
        assert!(patch.validate().is_err());

        let patch: UpdateServiceRequest =
            serde_json::from_value(serde_json::json!({ "notes": null })).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_replace_clears_omitted_nullables() {
        let replace: ReplaceServiceRequest = serde_json::from_value(serde_json::json!({
            "category_id": 2,
            "name_en": "Pool",
            "name_es": "Alberca",
            "price_min_usd": 1200
        }))
        .unwrap();

        let patch = UpdateServiceRequest::from(replace);
        assert_eq!(patch.category_id, Some(2));
        assert_eq!(patch.price_min_usd, Some(Some(rust_decimal_macros::dec!(1200))));
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.image, Some(None));
    }

    #[test]
    fn test_replace_requires_names() {
        let result = serde_json::from_value::<ReplaceServiceRequest>(serde_json::json!({
            "category_id": 2,
            "name_en": "Pool"
        }));
        assert!(result.is_err());
    }
}
