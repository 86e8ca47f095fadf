//! Request DTOs for marketplace endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::design::requests::nullable;
use crate::error::ValidationError;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters of the product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub architectural_style: Option<String>,
    #[serde(default)]
    pub min_area: Option<Decimal>,
    #[serde(default)]
    pub max_area: Option<Decimal>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub garage: Option<i32>,
    #[serde(default)]
    pub ordering: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Sort order of the product listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrdering {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    AreaAsc,
    AreaDesc,
}

impl ProductOrdering {
    /// `ORDER BY` clause; `id` breaks ties so pages never overlap
    pub fn sql(self) -> &'static str {
        match self {
            ProductOrdering::Newest => "created_at DESC, id DESC",
            ProductOrdering::Oldest => "created_at ASC, id ASC",
            ProductOrdering::PriceAsc => "price ASC, id ASC",
            ProductOrdering::PriceDesc => "price DESC, id DESC",
            ProductOrdering::AreaAsc => "area_m2 ASC, id ASC",
            ProductOrdering::AreaDesc => "area_m2 DESC, id DESC",
        }
    }
}

impl FromStr for ProductOrdering {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created_at" => Ok(ProductOrdering::Newest),
            "created_at" => Ok(ProductOrdering::Oldest),
            "price" => Ok(ProductOrdering::PriceAsc),
            "-price" => Ok(ProductOrdering::PriceDesc),
            "area_m2" => Ok(ProductOrdering::AreaAsc),
            "-area_m2" => Ok(ProductOrdering::AreaDesc),
            other => Err(ValidationError::invalid(format!(
                "ordering inválido: '{}'",
                other
            ))),
        }
    }
}

/// Validated listing filter, ready to bind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub architectural_style: Option<String>,
    pub min_area: Option<Decimal>,
    pub max_area: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub garage: Option<i32>,
    pub ordering: ProductOrdering,
    pub page: i64,
    pub page_size: i64,
}

impl ProductFilter {
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// `ILIKE` pattern for the search text, with wildcards escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|search| {
            let escaped = search
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
    }
}

impl ProductListQuery {
    pub fn into_filter(self) -> Result<ProductFilter, ValidationError> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        check_range("area", self.min_area, self.max_area)?;
        check_range("price", self.min_price, self.max_price)?;

        for (field, value) in [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("garage", self.garage),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(ValidationError::invalid(format!(
                    "{} no puede ser negativo",
                    field
                )));
            }
        }

        let ordering = match non_blank(self.ordering) {
            Some(raw) => raw.parse()?,
            None => ProductOrdering::default(),
        };

        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ValidationError::invalid("page debe ser al menos 1"));
        }

        Ok(ProductFilter {
            search: non_blank(self.search),
            architectural_style: non_blank(self.architectural_style),
            min_area: self.min_area,
            max_area: self.max_area,
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            garage: self.garage,
            ordering,
            page,
            page_size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        })
    }
}

fn check_range(
    field: &str,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<(), ValidationError> {
    if [min, max].iter().flatten().any(|v| *v < Decimal::ZERO) {
        return Err(ValidationError::invalid(format!(
            "{} no puede ser negativo",
            field
        )));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::invalid(format!(
                "min_{field} no puede ser mayor que max_{field}"
            )));
        }
    }
    Ok(())
}

/// Gallery image sent with a product
#[derive(Debug, Clone, Deserialize)]
pub struct NewProductImage {
    pub image: String,
    #[serde(default)]
    pub order: i32,
}

/// Request to publish a product
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub area_m2: Decimal,
    #[serde(default)]
    pub bedrooms: i32,
    #[serde(default)]
    pub bathrooms: i32,
    #[serde(default)]
    pub garage: i32,
    pub price: Decimal,
    #[serde(default)]
    pub architectural_style: String,
    #[serde(default)]
    pub main_image: Option<String>,
    #[serde(default)]
    pub images: Vec<NewProductImage>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(Some(&self.name))?;
        check_area(Some(self.area_m2))?;
        check_price(Some(self.price))?;
        check_counts([self.bedrooms, self.bathrooms, self.garage].map(Some))?;
        check_images(Some(&self.images))
    }
}

/// Partial update of a product. `main_image: null` clears the cover image;
/// `images`, when present, replaces the whole gallery.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area_m2: Option<Decimal>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub garage: Option<i32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub architectural_style: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub main_image: Option<Option<String>>,
    #[serde(default)]
    pub images: Option<Vec<NewProductImage>>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(self.name.as_deref())?;
        check_area(self.area_m2)?;
        check_price(self.price)?;
        check_counts([self.bedrooms, self.bathrooms, self.garage])?;
        check_images(self.images.as_deref())
    }
}

fn check_name(name: Option<&str>) -> Result<(), ValidationError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(ValidationError::invalid("name no puede estar vacío"));
    }
    Ok(())
}

fn check_area(area_m2: Option<Decimal>) -> Result<(), ValidationError> {
    if area_m2.is_some_and(|a| a <= Decimal::ZERO) {
        return Err(ValidationError::invalid("area_m2 debe ser mayor que cero"));
    }
    Ok(())
}

fn check_price(price: Option<Decimal>) -> Result<(), ValidationError> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ValidationError::invalid("price no puede ser negativo"));
    }
    Ok(())
}

fn check_counts(counts: [Option<i32>; 3]) -> Result<(), ValidationError> {
    if counts.iter().flatten().any(|c| *c < 0) {
        return Err(ValidationError::invalid(
            "bedrooms, bathrooms y garage no pueden ser negativos",
        ));
    }
    Ok(())
}

fn check_images(images: Option<&[NewProductImage]>) -> Result<(), ValidationError> {
    if images.is_some_and(|images| images.iter().any(|i| i.image.trim().is_empty())) {
        return Err(ValidationError::invalid("Cada imagen requiere una ruta"));
    }
    Ok(())
}

/// Body of the favorite toggle
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub visitor_id: Uuid,
}

/// Query of the favorites listing
#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub visitor_id: Uuid,
}

/// Visitor ids are client-generated; the nil id means the client never made one
pub fn check_visitor(visitor_id: Uuid) -> Result<(), ValidationError> {
    if visitor_id.is_nil() {
        return Err(ValidationError::invalid("visitor_id es obligatorio"));
    }
    Ok(())
}
