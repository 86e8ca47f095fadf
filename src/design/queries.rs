//! Database queries for the design calculator and catalog.

use sqlx::PgPool;

use crate::error::{AppError, Result};

use super::models::{Category, DesignEntry, GeneralConfig, NewDesignEntry, Service};
use super::requests::UpdateServiceRequest;

/// Insert a computed design and return the stored row
pub async fn insert_design_entry(pool: &PgPool, entry: &NewDesignEntry) -> Result<DesignEntry> {
    let calc = &entry.calculation;

    let stored = sqlx::query_as::<_, DesignEntry>(
        r#"
        INSERT INTO design_entries (
            area_total, area_basica, area_disponible, area_usada,
            porcentaje_ocupado, opciones, precio_total, correo
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING
            id, area_total, area_basica, area_disponible, area_usada,
            porcentaje_ocupado, opciones, precio_total, correo, created_at
        "#,
    )
    .bind(calc.area_total)
    .bind(calc.area_basica)
    .bind(calc.area_disponible)
    .bind(calc.area_usada)
    .bind(calc.porcentaje_ocupado)
    .bind(&entry.opciones)
    .bind(calc.precio_total)
    .bind(entry.correo.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// Get a stored design by id
pub async fn get_design_entry(pool: &PgPool, id: i64) -> Result<DesignEntry> {
    sqlx::query_as::<_, DesignEntry>(
        r#"
        SELECT
            id, area_total, area_basica, area_disponible, area_usada,
            porcentaje_ocupado, opciones, precio_total, correo, created_at
        FROM design_entries
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// List stored designs, newest first
pub async fn list_design_entries(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<DesignEntry>> {
    let entries = sqlx::query_as::<_, DesignEntry>(
        r#"
        SELECT
            id, area_total, area_basica, area_disponible, area_usada,
            porcentaje_ocupado, opciones, precio_total, correo, created_at
        FROM design_entries
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Get all design categories
pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, emoji
        FROM design_categories
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get services with optional category filter
pub async fn list_services(pool: &PgPool, category_id: Option<i32>) -> Result<Vec<Service>> {
    let services = match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, Service>(
                r#"
                SELECT
                    id, category_id, name_en, name_es, price_min_usd,
                    area_max_m2, max_units, notes, image
                FROM design_services
                WHERE category_id = $1
                ORDER BY id
                "#,
            )
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Service>(
                r#"
                SELECT
                    id, category_id, name_en, name_es, price_min_usd,
                    area_max_m2, max_units, notes, image
                FROM design_services
                ORDER BY id
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(services)
}

/// Get a single service
pub async fn get_service(pool: &PgPool, id: i32) -> Result<Service> {
    sqlx::query_as::<_, Service>(
        r#"
        SELECT
            id, category_id, name_en, name_es, price_min_usd,
            area_max_m2, max_units, notes, image
        FROM design_services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Apply a partial update to a service.
///
/// Required columns fall back to their current value through `COALESCE`.
/// Nullable columns take a presence flag so that an explicit `null` clears
/// them while an absent field leaves them alone.
pub async fn update_service(
    pool: &PgPool,
    id: i32,
    patch: &UpdateServiceRequest,
) -> Result<Service> {
    sqlx::query_as::<_, Service>(
        r#"
        UPDATE design_services SET
            category_id   = COALESCE($2, category_id),
            name_en       = COALESCE($3, name_en),
            name_es       = COALESCE($4, name_es),
            price_min_usd = CASE WHEN $5 THEN $6::numeric ELSE price_min_usd END,
            area_max_m2   = CASE WHEN $7 THEN $8::numeric ELSE area_max_m2 END,
            max_units     = CASE WHEN $9 THEN $10::integer ELSE max_units END,
            notes         = CASE WHEN $11 THEN $12::text ELSE notes END,
            image         = CASE WHEN $13 THEN $14::varchar ELSE image END
        WHERE id = $1
        RETURNING
            id, category_id, name_en, name_es, price_min_usd,
            area_max_m2, max_units, notes, image
        "#,
    )
    .bind(id)
    .bind(patch.category_id)
    .bind(patch.name_en.as_deref())
    .bind(patch.name_es.as_deref())
    .bind(patch.price_min_usd.is_some())
    .bind(patch.price_min_usd.flatten())
    .bind(patch.area_max_m2.is_some())
    .bind(patch.area_max_m2.flatten())
    .bind(patch.max_units.is_some())
    .bind(patch.max_units.flatten())
    .bind(patch.notes.is_some())
    .bind(patch.notes.as_ref().and_then(|v| v.as_deref()))
    .bind(patch.image.is_some())
    .bind(patch.image.as_ref().and_then(|v| v.as_deref()))
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        let unknown_category = e
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation());
        if unknown_category {
            AppError::InvalidInput("La categoría indicada no existe".to_string())
        } else {
            AppError::Database(e)
        }
    })?
    .ok_or(AppError::NotFound)
}

/// Delete a service
pub async fn delete_service(pool: &PgPool, id: i32) -> Result<()> {
    let result = sqlx::query("DELETE FROM design_services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// Get all general configuration rows
pub async fn list_general_config(pool: &PgPool) -> Result<Vec<GeneralConfig>> {
    let configs = sqlx::query_as::<_, GeneralConfig>(
        r#"
        SELECT key, value
        FROM design_general_config
        ORDER BY key
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::design::calculators::BASIC_AREA_RATIO;
    use crate::design::services::prepare_design_entry;

    async fn seed_service(pool: &PgPool) -> (i32, i32) {
        let (category_id,): (i32,) = sqlx::query_as(
            "INSERT INTO design_categories (name, emoji) VALUES ('Exterior', NULL) RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let (service_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO design_services (category_id, name_en, name_es, price_min_usd, notes, image)
            VALUES ($1, 'Pool', 'Alberca', 1500, 'Heated', 'pool.jpg')
            RETURNING id
            "#,
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
        .unwrap();

        (category_id, service_id)
    }

    fn patch(body: serde_json::Value) -> UpdateServiceRequest {
        serde_json::from_value(body).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_insert_and_get_design_entry(pool: PgPool) {
        let opciones = json!([
            { "id": "pool", "area": 20, "price": 500 },
            { "id": "gym", "area": 10, "price": 300 }
        ]);
        let entry = prepare_design_entry(
            BASIC_AREA_RATIO,
            serde_json::from_value(json!({
                "area_total": 100,
                "opciones": opciones,
                "correo": "cliente@example.com"
            }))
            .unwrap(),
        )
        .unwrap();

        let stored = insert_design_entry(&pool, &entry).await.unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.opciones, opciones);
        assert_eq!(stored.area_disponible, dec!(50));
        assert_eq!(stored.precio_total, dec!(800));
        assert_eq!(stored.correo.as_deref(), Some("cliente@example.com"));

        let fetched = get_design_entry(&pool, stored.id).await.unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.created_at, stored.created_at);
        assert_eq!(fetched.opciones, opciones);
        assert_eq!(fetched.porcentaje_ocupado, dec!(60));

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM design_entries")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_missing_design_entry_is_not_found(pool: PgPool) {
        let err = get_design_entry(&pool, 4242).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_missing_service_is_not_found(pool: PgPool) {
        let err = update_service(&pool, 999, &patch(json!({ "name_en": "Gym" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_unknown_category_is_invalid_input(pool: PgPool) {
        let (_, service_id) = seed_service(&pool).await;

        let err = update_service(&pool, service_id, &patch(json!({ "category_id": 9999 })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains("categoría")));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_clears_only_explicit_nulls(pool: PgPool) {
        let (category_id, service_id) = seed_service(&pool).await;

        let updated = update_service(
            &pool,
            service_id,
            &patch(json!({ "notes": null, "max_units": 2 })),
        )
        .await
        .unwrap();

        assert_eq!(updated.category_id, category_id);
        assert_eq!(updated.name_es, "Alberca");
        assert_eq!(updated.notes, None);
        assert_eq!(updated.max_units, Some(2));
        // Absent fields keep their stored values
        assert_eq!(updated.price_min_usd, Some(dec!(1500)));
        assert_eq!(updated.image.as_deref(), Some("pool.jpg"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_service_is_not_found(pool: PgPool) {
        let err = delete_service(&pool, 31337).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
