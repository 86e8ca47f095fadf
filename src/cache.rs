//! In-memory caching using moka
//!
//! Caches the design catalog (categories, services, general config) and the
//! marketplace filter configuration, which change only through admin edits.
//! Design entries and marketplace products are never cached.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::design::models::{Category, GeneralConfig, Service};
use crate::design::queries;
use crate::marketplace::models::FilterConfig;
use crate::marketplace::queries as marketplace_queries;

const CATEGORIES_KEY: &str = "categories";
const GENERAL_CONFIG_KEY: &str = "general_config";
const FILTER_CONFIGS_KEY: &str = "filter_configs";

/// Application cache holding catalog listings
#[derive(Clone)]
pub struct AppCache {
    /// Category listing (singleton)
    pub categories: Cache<String, Arc<Vec<Category>>>,
    /// Service listings (cache_key -> Vec<Service>)
    pub services: Cache<String, Arc<Vec<Service>>>,
    /// General config rows (singleton)
    pub general_config: Cache<String, Arc<Vec<GeneralConfig>>>,
    /// Marketplace filter definitions (singleton)
    pub filter_configs: Cache<String, Arc<Vec<FilterConfig>>>,
    /// Bumped on every service write; part of each listing key so a read
    /// that started before the write can only fill a key nobody asks for.
    services_generation: Arc<AtomicU64>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Categories: 1 entry, 30 min TTL
            categories: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Service listings: one per category filter plus "all", 15 min TTL
            services: Cache::builder()
                .max_capacity(100)
                .time_to_live(Duration::from_secs(15 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            // General config: 1 entry, 30 min TTL
            general_config: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Filter configs: 1 entry, 1 hour TTL
            filter_configs: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),

            services_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            categories_cached: self.categories.entry_count() > 0,
            service_listings: self.services.entry_count(),
            general_config_cached: self.general_config.entry_count() > 0,
            filter_configs_cached: self.filter_configs.entry_count() > 0,
        }
    }

    /// Drop every service listing after a service changed
    pub fn invalidate_services(&self) {
        self.services_generation.fetch_add(1, Ordering::SeqCst);
        self.services.invalidate_all();
        info!("Service listing cache invalidated");
    }

    /// Generate cache key for a service listing in the current generation
    pub fn services_key(&self, category_id: Option<i32>) -> String {
        let generation = self.services_generation.load(Ordering::SeqCst);
        match category_id {
            Some(id) => format!("services:{}:{}", generation, id),
            None => format!("services:{}:all", generation),
        }
    }

    pub async fn get_services(&self, key: &str) -> Option<Arc<Vec<Service>>> {
        self.services.get(key).await
    }

    pub async fn put_services(&self, key: String, services: Vec<Service>) -> Arc<Vec<Service>> {
        let services = Arc::new(services);
        self.services.insert(key, services.clone()).await;
        services
    }

    pub async fn get_categories(&self) -> Option<Arc<Vec<Category>>> {
        self.categories.get(CATEGORIES_KEY).await
    }

    pub async fn put_categories(&self, categories: Vec<Category>) -> Arc<Vec<Category>> {
        let categories = Arc::new(categories);
        self.categories
            .insert(CATEGORIES_KEY.to_string(), categories.clone())
            .await;
        categories
    }

    pub async fn get_general_config(&self) -> Option<Arc<Vec<GeneralConfig>>> {
        self.general_config.get(GENERAL_CONFIG_KEY).await
    }

    pub async fn put_general_config(&self, rows: Vec<GeneralConfig>) -> Arc<Vec<GeneralConfig>> {
        let rows = Arc::new(rows);
        self.general_config
            .insert(GENERAL_CONFIG_KEY.to_string(), rows.clone())
            .await;
        rows
    }

    pub async fn get_filter_configs(&self) -> Option<Arc<Vec<FilterConfig>>> {
        self.filter_configs.get(FILTER_CONFIGS_KEY).await
    }

    pub async fn put_filter_configs(&self, configs: Vec<FilterConfig>) -> Arc<Vec<FilterConfig>> {
        let configs = Arc::new(configs);
        self.filter_configs
            .insert(FILTER_CONFIGS_KEY.to_string(), configs.clone())
            .await;
        configs
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub categories_cached: bool,
    pub service_listings: u64,
    pub general_config_cached: bool,
    pub filter_configs_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_categories(db).await {
        Ok(categories) => {
            cache.put_categories(categories).await;
        }
        Err(e) => warn!("Failed to warm categories cache: {}", e),
    }

    let key = cache.services_key(None);
    match queries::list_services(db, None).await {
        Ok(services) => {
            cache.put_services(key, services).await;
        }
        Err(e) => warn!("Failed to warm services cache: {}", e),
    }

    match queries::list_general_config(db).await {
        Ok(rows) => {
            cache.put_general_config(rows).await;
        }
        Err(e) => warn!("Failed to warm general config cache: {}", e),
    }

    match marketplace_queries::list_filter_configs(db).await {
        Ok(configs) => {
            cache.put_filter_configs(configs).await;
        }
        Err(e) => warn!("Failed to warm filter config cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            emoji: None,
        }
    }

    fn service(id: i32) -> Service {
        Service {
            id,
            category_id: 1,
            name_en: "Pool".to_string(),
            name_es: "Alberca".to_string(),
            price_min_usd: None,
            area_max_m2: None,
            max_units: None,
            notes: None,
            image: None,
        }
    }

    #[test]
    fn test_services_key() {
        let cache = AppCache::new();
        assert_eq!(cache.services_key(None), "services:0:all");
        assert_eq!(cache.services_key(Some(3)), "services:0:3");

        cache.invalidate_services();
        assert_eq!(cache.services_key(Some(3)), "services:1:3");
    }

    #[tokio::test]
    async fn test_categories_round_trip() {
        let cache = AppCache::new();
        assert!(cache.get_categories().await.is_none());

        cache
            .put_categories(vec![category(1, "Basics"), category(2, "Family")])
            .await;

        let cached = cache.get_categories().await.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[1].name, "Family");
    }

    #[tokio::test]
    async fn test_invalidate_services_keeps_categories() {
        let cache = AppCache::new();
        cache.put_categories(vec![category(1, "Basics")]).await;
        let key = cache.services_key(Some(1));
        cache.put_services(key.clone(), vec![service(1)]).await;

        cache.invalidate_services();

        assert!(cache.get_services(&key).await.is_none());
        assert!(cache.get_categories().await.is_some());
    }

    #[tokio::test]
    async fn test_read_started_before_write_cannot_serve_stale_listing() {
        let cache = AppCache::new();

        // A reader computes its key, then a write lands before it stores
        let stale_key = cache.services_key(None);
        cache.invalidate_services();
        cache.put_services(stale_key, vec![service(1)]).await;

        // The next reader looks under the new generation and misses
        let fresh_key = cache.services_key(None);
        assert!(cache.get_services(&fresh_key).await.is_none());
    }
}
