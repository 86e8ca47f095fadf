//! Database queries for the marketplace

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::models::{FilterConfig, FilterConfigRow, Product, ProductImage};
use super::requests::{CreateProductRequest, NewProductImage, ProductFilter, UpdateProductRequest};

const PRODUCT_COLUMNS: &str = r#"
    id, name, description, area_m2, bedrooms, bathrooms, garage, price,
    architectural_style, main_image, created_at, updated_at
"#;

/// Every listing filter is optional; a NULL parameter disables its clause
const PRODUCT_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
      AND ($2::text IS NULL OR lower(architectural_style) = lower($2))
      AND ($3::numeric IS NULL OR area_m2 >= $3)
      AND ($4::numeric IS NULL OR area_m2 <= $4)
      AND ($5::numeric IS NULL OR price >= $5)
      AND ($6::numeric IS NULL OR price <= $6)
      AND ($7::integer IS NULL OR bedrooms >= $7)
      AND ($8::integer IS NULL OR bathrooms >= $8)
      AND ($9::integer IS NULL OR garage >= $9)
"#;

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &ProductFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(filter.search_pattern())
        .bind(filter.architectural_style.clone())
        .bind(filter.min_area)
        .bind(filter.max_area)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.bedrooms)
        .bind(filter.bathrooms)
        .bind(filter.garage)
}

/// One page of products matching the filter, plus the total match count
pub async fn list_products(pool: &PgPool, filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
    let count_sql = format!("SELECT COUNT(*) FROM marketplace_products {PRODUCT_FILTER}");
    let (count,): (i64,) = bind_filter(sqlx::query_as(&count_sql), filter)
        .fetch_one(pool)
        .await?;

    let page_sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM marketplace_products {PRODUCT_FILTER} ORDER BY {} LIMIT $10 OFFSET $11",
        filter.ordering.sql()
    );
    let products = bind_filter(sqlx::query_as::<_, Product>(&page_sql), filter)
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(pool)
        .await?;

    Ok((products, count))
}

/// Get a product by id
pub async fn get_product(pool: &PgPool, id: i32) -> Result<Product> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM marketplace_products WHERE id = $1");
    sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

/// Gallery images of the given products, in display order
pub async fn images_for(pool: &PgPool, product_ids: &[i32]) -> Result<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
        r#"
        SELECT id, product_id, image, sort_order
        FROM marketplace_product_images
        WHERE product_id = ANY($1)
        ORDER BY product_id, sort_order, id
        "#,
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

/// Insert a product and its gallery
pub async fn create_product(pool: &PgPool, request: &CreateProductRequest) -> Result<Product> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        r#"
        INSERT INTO marketplace_products (
            name, description, area_m2, bedrooms, bathrooms, garage, price,
            architectural_style, main_image
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {PRODUCT_COLUMNS}
        "#
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(request.area_m2)
        .bind(request.bedrooms)
        .bind(request.bathrooms)
        .bind(request.garage)
        .bind(request.price)
        .bind(request.architectural_style.trim())
        .bind(request.main_image.as_deref())
        .fetch_one(&mut *tx)
        .await?;

    replace_images(&mut tx, product.id, &request.images).await?;
    tx.commit().await?;

    Ok(product)
}

/// Apply a partial update; a present `images` list replaces the gallery
pub async fn update_product(
    pool: &PgPool,
    id: i32,
    patch: &UpdateProductRequest,
) -> Result<Product> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        r#"
        UPDATE marketplace_products SET
            name                = COALESCE($2, name),
            description         = COALESCE($3, description),
            area_m2             = COALESCE($4, area_m2),
            bedrooms            = COALESCE($5, bedrooms),
            bathrooms           = COALESCE($6, bathrooms),
            garage              = COALESCE($7, garage),
            price               = COALESCE($8, price),
            architectural_style = COALESCE($9, architectural_style),
            main_image          = CASE WHEN $10 THEN $11::varchar ELSE main_image END,
            updated_at          = now()
        WHERE id = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(patch.description.as_deref())
        .bind(patch.area_m2)
        .bind(patch.bedrooms)
        .bind(patch.bathrooms)
        .bind(patch.garage)
        .bind(patch.price)
        .bind(patch.architectural_style.as_deref().map(str::trim))
        .bind(patch.main_image.is_some())
        .bind(patch.main_image.as_ref().and_then(|v| v.as_deref()))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(images) = &patch.images {
        replace_images(&mut tx, id, images).await?;
    }
    tx.commit().await?;

    Ok(product)
}

async fn replace_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i32,
    images: &[NewProductImage],
) -> Result<()> {
    sqlx::query("DELETE FROM marketplace_product_images WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    if images.is_empty() {
        return Ok(());
    }

    let paths: Vec<&str> = images.iter().map(|i| i.image.trim()).collect();
    let orders: Vec<i32> = images.iter().map(|i| i.order).collect();

    sqlx::query(
        r#"
        INSERT INTO marketplace_product_images (product_id, image, sort_order)
        SELECT $1, image, sort_order
        FROM UNNEST($2::varchar[], $3::integer[]) AS t (image, sort_order)
        "#,
    )
    .bind(product_id)
    .bind(paths)
    .bind(orders)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Delete a product; its gallery and favorites go with it
pub async fn delete_product(pool: &PgPool, id: i32) -> Result<()> {
    let result = sqlx::query("DELETE FROM marketplace_products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// Filter definitions in display order
pub async fn list_filter_configs(pool: &PgPool) -> Result<Vec<FilterConfig>> {
    let rows = sqlx::query_as::<_, FilterConfigRow>(
        r#"
        SELECT name, key, options
        FROM marketplace_filter_configs
        ORDER BY sort_order, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FilterConfig::from).collect())
}

/// Flip a visitor's favorite flag and return the new state.
///
/// The advisory lock serializes toggles of the same (product, visitor)
/// pair, so two quick clicks always alternate.
pub async fn toggle_favorite(pool: &PgPool, product_id: i32, visitor_id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2::text))")
        .bind(product_id)
        .bind(visitor_id)
        .execute(&mut *tx)
        .await?;

    let (favorited,): (bool,) = sqlx::query_as(
        r#"
        INSERT INTO marketplace_favorite_events (product_id, visitor_id, favorited)
        SELECT $1, $2, NOT COALESCE((
            SELECT favorited
            FROM marketplace_favorite_events
            WHERE product_id = $1 AND visitor_id = $2
            ORDER BY id DESC
            LIMIT 1
        ), false)
        RETURNING favorited
        "#,
    )
    .bind(product_id)
    .bind(visitor_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        let unknown_product = e
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation());
        if unknown_product {
            AppError::NotFound
        } else {
            AppError::Database(e)
        }
    })?;

    tx.commit().await?;
    Ok(favorited)
}

/// Products whose latest event from this visitor is a favorite
pub async fn favorite_products(pool: &PgPool, visitor_id: Uuid) -> Result<Vec<Product>> {
    let sql = format!(
        r#"
        SELECT {PRODUCT_COLUMNS}
        FROM marketplace_products
        JOIN (
            SELECT DISTINCT ON (product_id) product_id, favorited
            FROM marketplace_favorite_events
            WHERE visitor_id = $1
            ORDER BY product_id, id DESC
        ) AS latest ON latest.product_id = marketplace_products.id
        WHERE latest.favorited
        ORDER BY marketplace_products.id DESC
        "#
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(visitor_id)
        .fetch_all(pool)
        .await?;

    Ok(products)
}
