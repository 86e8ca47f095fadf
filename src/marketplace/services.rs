//! Marketplace service functions.
//!
//! Validation happens here before any query runs; the filter configuration
//! is read through the application cache.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::Result;

use super::models::{FilterConfig, Product, ProductImage};
use super::queries;
use super::requests::{
    check_visitor, CreateProductRequest, ProductListQuery, UpdateProductRequest,
};
use super::responses::{FavoriteResponse, ProductPage, ProductResponse};

/// Filtered, paginated product listing
pub async fn list_products(pool: &PgPool, query: ProductListQuery) -> Result<ProductPage> {
    let filter = query.into_filter()?;

    let (products, count) = queries::list_products(pool, &filter).await?;
    let results = with_images(pool, products).await?;

    Ok(ProductPage::new(&filter, count, results))
}

/// One product with its gallery
pub async fn product_detail(pool: &PgPool, id: i32) -> Result<ProductResponse> {
    let product = queries::get_product(pool, id).await?;
    let images = queries::images_for(pool, &[id]).await?;

    Ok(ProductResponse::new(product, images))
}

pub async fn create_product(pool: &PgPool, request: CreateProductRequest) -> Result<ProductResponse> {
    request.validate()?;

    let product = queries::create_product(pool, &request).await?;
    tracing::info!(id = product.id, name = %product.name, "Marketplace product created");

    let images = queries::images_for(pool, &[product.id]).await?;
    Ok(ProductResponse::new(product, images))
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    patch: UpdateProductRequest,
) -> Result<ProductResponse> {
    patch.validate()?;

    let product = queries::update_product(pool, id, &patch).await?;
    tracing::info!(id = product.id, "Marketplace product updated");

    let images = queries::images_for(pool, &[id]).await?;
    Ok(ProductResponse::new(product, images))
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<()> {
    queries::delete_product(pool, id).await?;
    tracing::info!(id, "Marketplace product deleted");
    Ok(())
}

/// Filter definitions, cached
pub async fn filter_configs(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<FilterConfig>>> {
    if let Some(cached) = cache.get_filter_configs().await {
        tracing::debug!("Cache HIT for filter configs");
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for filter configs");
    let configs = queries::list_filter_configs(pool).await?;
    Ok(cache.put_filter_configs(configs).await)
}

pub async fn toggle_favorite(
    pool: &PgPool,
    product_id: i32,
    visitor_id: Uuid,
) -> Result<FavoriteResponse> {
    check_visitor(visitor_id)?;

    let favorited = queries::toggle_favorite(pool, product_id, visitor_id).await?;
    tracing::debug!(product_id, %visitor_id, favorited, "Marketplace favorite toggled");

    Ok(FavoriteResponse {
        product_id,
        favorited,
    })
}

pub async fn favorite_products(pool: &PgPool, visitor_id: Uuid) -> Result<Vec<ProductResponse>> {
    check_visitor(visitor_id)?;

    let products = queries::favorite_products(pool, visitor_id).await?;
    with_images(pool, products).await
}

async fn with_images(pool: &PgPool, products: Vec<Product>) -> Result<Vec<ProductResponse>> {
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let images = queries::images_for(pool, &ids).await?;

    Ok(attach_images(products, images))
}

/// Group images under their product, keeping product order
fn attach_images(products: Vec<Product>, images: Vec<ProductImage>) -> Vec<ProductResponse> {
    let mut by_product: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in images {
        by_product.entry(image.product_id).or_default().push(image);
    }

    products
        .into_iter()
        .map(|product| {
            let images = by_product.remove(&product.id).unwrap_or_default();
            ProductResponse::new(product, images)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(id: i32) -> Product {
        Product {
            id,
            name: format!("Casa {id}"),
            description: String::new(),
            area_m2: dec!(120),
            bedrooms: 2,
            bathrooms: 1,
            garage: 1,
            price: dec!(1800000),
            architectural_style: "Colonial".to_string(),
            main_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn image(id: i32, product_id: i32) -> ProductImage {
        ProductImage {
            id,
            product_id,
            image: format!("products/{id}.jpg"),
            sort_order: id,
        }
    }

    #[test]
    fn test_attach_images_groups_by_product() {
        let products = vec![product(3), product(1), product(2)];
        let images = vec![image(10, 1), image(11, 3), image(12, 1)];

        let responses = attach_images(products, images);

        let ids: Vec<i32> = responses.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(responses[0].images.len(), 1);
        assert_eq!(responses[1].images.len(), 2);
        assert!(responses[2].images.is_empty());
    }

    #[tokio::test]
    async fn test_filter_configs_served_from_cache() {
        let cache = AppCache::new();
        cache
            .put_filter_configs(vec![FilterConfig {
                name: "Estilo".to_string(),
                key: "style".to_string(),
                options: vec![],
            }])
            .await;

        // The lazy pool is never touched on a cache hit
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost:5432/design_studio_test")
            .unwrap();

        let configs = filter_configs(&pool, &cache).await.unwrap();
        assert_eq!(configs[0].key, "style");
    }
}
