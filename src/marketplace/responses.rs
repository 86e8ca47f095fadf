//! Response DTOs for marketplace endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Product, ProductImage};
use super::requests::ProductFilter;

#[derive(Debug, Clone, Serialize)]
pub struct ProductImageResponse {
    pub id: i32,
    pub image: String,
    pub order: i32,
}

impl From<ProductImage> for ProductImageResponse {
    fn from(image: ProductImage) -> Self {
        Self {
            id: image.id,
            image: image.image,
            order: image.sort_order,
        }
    }
}

/// Product with its gallery
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_m2: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub area_sqft: Decimal,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub garage: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub architectural_style: String,
    pub main_image: Option<String>,
    pub images: Vec<ProductImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, images: Vec<ProductImage>) -> Self {
        Self {
            area_sqft: product.area_sqft(),
            id: product.id,
            name: product.name,
            description: product.description,
            area_m2: product.area_m2,
            bedrooms: product.bedrooms,
            bathrooms: product.bathrooms,
            garage: product.garage,
            price: product.price,
            architectural_style: product.architectural_style,
            main_image: product.main_image,
            images: images.into_iter().map(Into::into).collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// One page of the product listing. `next` and `previous` are page numbers.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<ProductResponse>,
}

impl ProductPage {
    pub fn new(filter: &ProductFilter, count: i64, results: Vec<ProductResponse>) -> Self {
        let seen = filter.offset().saturating_add(results.len() as i64);

        Self {
            count,
            page: filter.page,
            page_size: filter.page_size,
            next: (seen < count).then_some(filter.page + 1),
            previous: (filter.page > 1).then_some(filter.page - 1),
            results,
        }
    }
}

/// Visitor's favorite state after a toggle
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FavoriteResponse {
    pub product_id: i32,
    pub favorited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::marketplace::requests::ProductListQuery;

    fn product() -> Product {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Product {
            id: 7,
            name: "Casa Jacaranda".to_string(),
            description: String::new(),
            area_m2: dec!(100),
            bedrooms: 3,
            bathrooms: 2,
            garage: 1,
            price: dec!(2450000),
            architectural_style: "Moderno".to_string(),
            main_image: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn results(n: usize) -> Vec<ProductResponse> {
        (0..n).map(|_| ProductResponse::new(product(), vec![])).collect()
    }

    fn filter(page: i64, page_size: i64) -> ProductFilter {
        let query: ProductListQuery =
            serde_json::from_value(json!({ "page": page, "page_size": page_size })).unwrap();
        query.into_filter().unwrap()
    }

    #[test]
    fn test_product_response_shape() {
        let image = ProductImage {
            id: 1,
            product_id: 7,
            image: "products/jacaranda-1.jpg".to_string(),
            sort_order: 2,
        };
        let value = serde_json::to_value(ProductResponse::new(product(), vec![image])).unwrap();

        assert_eq!(value["area_m2"], json!(100.0));
        assert_eq!(value["area_sqft"], json!(1076.39));
        assert_eq!(value["price"], json!(2450000.0));
        assert_eq!(
            value["images"],
            json!([{ "id": 1, "image": "products/jacaranda-1.jpg", "order": 2 }])
        );
    }

    #[test]
    fn test_page_links() {
        let first = ProductPage::new(&filter(1, 2), 5, results(2));
        assert_eq!((first.next, first.previous), (Some(2), None));

        let middle = ProductPage::new(&filter(2, 2), 5, results(2));
        assert_eq!((middle.next, middle.previous), (Some(3), Some(1)));

        let last = ProductPage::new(&filter(3, 2), 5, results(1));
        assert_eq!((last.next, last.previous), (None, Some(2)));
    }

    #[test]
    fn test_page_past_the_end() {
        let page = ProductPage::new(&filter(9, 10), 3, results(0));
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(8));
        assert!(page.results.is_empty());
    }
}
