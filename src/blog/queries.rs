//! Database queries for blog posts and the interaction log

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::models::{BlogPost, InteractionCounts, InteractionEvent, VisitorState};

/// Featured posts shown on the home page
pub const FEATURED_LIMIT: i64 = 4;

/// Get all blog posts, newest first
pub async fn list_posts(pool: &PgPool) -> Result<Vec<BlogPost>> {
    let posts = sqlx::query_as::<_, BlogPost>(
        r#"
        SELECT id, title, category, image, date, read_time, featured
        FROM blog_posts
        ORDER BY date DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Get featured posts, newest first
pub async fn featured_posts(pool: &PgPool) -> Result<Vec<BlogPost>> {
    let posts = sqlx::query_as::<_, BlogPost>(
        r#"
        SELECT id, title, category, image, date, read_time, featured
        FROM blog_posts
        WHERE featured = true
        ORDER BY date DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(FEATURED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Get a blog post by id
pub async fn get_post(pool: &PgPool, id: i32) -> Result<BlogPost> {
    sqlx::query_as::<_, BlogPost>(
        r#"
        SELECT id, title, category, image, date, read_time, featured
        FROM blog_posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Append a like/favorite event for a visitor
pub async fn record_interaction(
    pool: &PgPool,
    blog_id: i32,
    visitor_id: Uuid,
    liked: bool,
    favorited: bool,
) -> Result<InteractionEvent> {
    sqlx::query_as::<_, InteractionEvent>(
        r#"
        INSERT INTO blog_interaction_events (blog_id, visitor_id, liked, favorited)
        VALUES ($1, $2, $3, $4)
        RETURNING id, blog_id, visitor_id, liked, favorited, created_at
        "#,
    )
    .bind(blog_id)
    .bind(visitor_id)
    .bind(liked)
    .bind(favorited)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        let unknown_post = e
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation());
        if unknown_post {
            AppError::NotFound
        } else {
            AppError::Database(e)
        }
    })
}

/// Count likes and favorites over each visitor's latest event
pub async fn interaction_counts(pool: &PgPool, blog_id: i32) -> Result<InteractionCounts> {
    let counts = sqlx::query_as::<_, InteractionCounts>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE latest.liked) AS likes,
            COUNT(*) FILTER (WHERE latest.favorited) AS favorites
        FROM (
            SELECT DISTINCT ON (visitor_id) liked, favorited
            FROM blog_interaction_events
            WHERE blog_id = $1
            ORDER BY visitor_id, id DESC
        ) AS latest
        "#,
    )
    .bind(blog_id)
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

/// Latest state recorded by one visitor, if any
pub async fn visitor_state(
    pool: &PgPool,
    blog_id: i32,
    visitor_id: Uuid,
) -> Result<Option<VisitorState>> {
    let state = sqlx::query_as::<_, VisitorState>(
        r#"
        SELECT liked, favorited
        FROM blog_interaction_events
        WHERE blog_id = $1 AND visitor_id = $2
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(blog_id)
    .bind(visitor_id)
    .fetch_optional(pool)
    .await?;

    Ok(state)
}
