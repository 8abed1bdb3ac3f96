//! In-process query cache for storefront reads.
//!
//! Each read shape has its own typed cache. Admin mutations call one of the
//! `invalidate_*` methods after a successful write; entries also expire after the
//! configured TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::storefront::{CategoryContent, CategoryNode, HomepageSectionView, SubcategoryContent};

#[derive(Clone)]
pub struct StorefrontCache {
    pub(crate) banners: Cache<(), Arc<Vec<models::banner::Model>>>,
    pub(crate) homepage: Cache<(), Arc<Vec<HomepageSectionView>>>,
    pub(crate) category_tree: Cache<(), Arc<Vec<CategoryNode>>>,
    pub(crate) category_content: Cache<String, Arc<CategoryContent>>,
    pub(crate) subcategory_content: Cache<String, Arc<SubcategoryContent>>,
    pub(crate) services: Cache<String, Arc<models::catalog_service::Model>>,
    pub(crate) products: Cache<String, Arc<models::product::Model>>,
}

impl StorefrontCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        fn build<K, V>(ttl: Duration, cap: u64) -> Cache<K, V>
        where
            K: std::hash::Hash + Eq + Send + Sync + 'static,
            V: Clone + Send + Sync + 'static,
        {
            Cache::builder().max_capacity(cap).time_to_live(ttl).build()
        }
        Self {
            banners: build(ttl, 1),
            homepage: build(ttl, 1),
            category_tree: build(ttl, 1),
            category_content: build(ttl, max_capacity),
            subcategory_content: build(ttl, max_capacity),
            services: build(ttl, max_capacity),
            products: build(ttl, max_capacity),
        }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self {
        Self::new(Duration::from_secs(cfg.ttl_secs), cfg.max_capacity)
    }

    pub fn invalidate_banners(&self) {
        debug!(event = "cache_invalidate", scope = "banners");
        self.banners.invalidate_all();
    }

    /// Categories, subcategories, carousels, services and homepage sections all feed
    /// the same navigation and content pages, so they are dropped together.
    pub fn invalidate_catalog(&self) {
        debug!(event = "cache_invalidate", scope = "catalog");
        self.homepage.invalidate_all();
        self.category_tree.invalidate_all();
        self.category_content.invalidate_all();
        self.subcategory_content.invalidate_all();
        self.services.invalidate_all();
    }

    pub fn invalidate_products(&self) {
        debug!(event = "cache_invalidate", scope = "products");
        self.products.invalidate_all();
    }
}

impl Default for StorefrontCache {
    fn default() -> Self { Self::new(Duration::from_secs(60), 1_000) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;

    #[tokio::test]
    async fn invalidation_forces_reload() {
        let cache = StorefrontCache::default();
        let first = cache.banners.try_get_with((), async { Ok::<_, ServiceError>(Arc::new(Vec::new())) }).await.unwrap();
        assert!(first.is_empty());
        assert!(cache.banners.get(&()).await.is_some());

        cache.invalidate_banners();
        assert!(cache.banners.get(&()).await.is_none());
    }

    #[tokio::test]
    async fn loader_errors_are_not_cached() {
        let cache = StorefrontCache::default();
        let err = cache
            .products
            .try_get_with("missing".to_string(), async { Err::<Arc<models::product::Model>, _>(ServiceError::not_found("product")) })
            .await
            .unwrap_err();
        assert!(matches!(ServiceError::from(err), ServiceError::NotFound(_)));
        assert!(cache.products.get("missing").await.is_none());
    }
}
