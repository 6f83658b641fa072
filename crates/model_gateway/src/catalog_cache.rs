//! TTL cache in front of a model catalog.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use prompt_forge_core::{traits::ModelCatalog, types::ModelDescriptor, Result};

/// Cached catalog snapshot.
#[derive(Debug, Clone)]
struct CacheEntry {
    models: Vec<ModelDescriptor>,
    fetched_at: Instant,
}

/// Catalog wrapper that reuses the last successful listing for `ttl`.
///
/// Failures are never cached. A zero TTL disables caching entirely.
pub struct CachedCatalog<C> {
    inner: C,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl<C: ModelCatalog> CachedCatalog<C> {
    /// Wrap `inner` with a one hour TTL.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            ttl: Duration::from_secs(3600),
            entry: RwLock::new(None),
        }
    }

    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The wrapped catalog.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn fresh(&self) -> Option<Vec<ModelDescriptor>> {
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.models.clone())
    }
}

#[async_trait]
impl<C: ModelCatalog> ModelCatalog for CachedCatalog<C> {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        if self.ttl.is_zero() {
            return self.inner.list_models().await;
        }

        if let Some(models) = self.fresh().await {
            tracing::trace!(count = models.len(), "Model catalog cache hit");
            return Ok(models);
        }

        let models = self.inner.list_models().await?;
        *self.entry.write().await = Some(CacheEntry {
            models: models.clone(),
            fetched_at: Instant::now(),
        });
        tracing::debug!(count = models.len(), ttl_secs = self.ttl.as_secs(), "Model catalog cached");

        Ok(models)
    }
}
