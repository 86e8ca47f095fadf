//! Design studio backend.
//!
//! JSON API for the design area calculator, website quotes, the design
//! catalog, the house-design marketplace, blog posts and the project
//! portfolio.

pub mod blog;
pub mod cache;
pub mod config;
pub mod db;
pub mod design;
pub mod error;
pub mod marketplace;
pub mod projects;
pub mod quote;
pub mod routes;

use sqlx::PgPool;
use std::sync::Arc;

pub use routes::app;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: cache::AppCache,
    pub config: Arc<config::Config>,
}
