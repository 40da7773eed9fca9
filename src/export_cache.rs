/*!
 * Per-locale export cache.
 *
 * This module maintains a materialized key -> text mapping per locale,
 * computed from the record store with a read-through strategy: a cached,
 * unexpired entry is served as-is; anything else triggers a full recompute
 * that is stored with a fixed time-to-live.
 *
 * The cache is process-wide shared state. Writes that touch a locale must
 * call `invalidate` before being acknowledged; the TTL only bounds staleness
 * for writes that bypass invalidation.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::RwLock;

use crate::database::Repository;
use crate::errors::StoreError;

/// Materialized export for one locale: translation key -> text.
///
/// Keys without content for the locale are present with `None` rather than
/// omitted, so the key set always mirrors the full translation key set.
pub type ExportMap = BTreeMap<String, Option<String>>;

/// Default time-to-live for a cached export entry
pub const DEFAULT_EXPORT_TTL: Duration = Duration::from_secs(60);

/// Cached export with its expiry deadline
struct CacheEntry {
    /// Materialized export for the locale
    export: ExportMap,
    /// Point in time after which the entry must be recomputed
    expires_at: Instant,
}

/// Read-through export cache, shared across all concurrent requests
pub struct ExportCache {
    /// Record store handle used for recomputation
    repo: Repository,

    /// Fixed time-to-live applied to every stored entry
    ttl: Duration,

    /// Cached entries, keyed by locale code. The lock is held only for map
    /// access, never across the record store scan, so concurrent misses for
    /// the same locale may recompute redundantly; recomputation is a pure
    /// read and redundancy is safe, only wasteful.
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ExportCache {
    /// Create a new export cache with the default TTL
    pub fn new(repo: Repository) -> Self {
        Self::with_ttl(repo, DEFAULT_EXPORT_TTL)
    }

    /// Create a new export cache with a custom TTL
    pub fn with_ttl(repo: Repository, ttl: Duration) -> Self {
        Self {
            repo,
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the export for a locale, recomputing on miss or expiry
    pub async fn get(&self, locale: &str) -> Result<ExportMap, StoreError> {
        if let Some(export) = self.lookup(locale) {
            debug!("Export cache hit for locale '{}'", locale);
            return Ok(export);
        }

        debug!("Export cache miss for locale '{}', recomputing", locale);
        let export = self.compute(locale).await?;

        let mut entries = self.entries.write();
        entries.insert(
            locale.to_string(),
            CacheEntry {
                export: export.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );

        Ok(export)
    }

    /// Remove the cached entry for a locale, if present
    ///
    /// Idempotent and infallible; invalidating an uncached locale is a no-op.
    pub fn invalidate(&self, locale: &str) {
        let mut entries = self.entries.write();
        if entries.remove(locale).is_some() {
            debug!("Invalidated export cache for locale '{}'", locale);
        }
    }

    /// Drop all cached entries
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Return the cached export for a locale when present and unexpired
    fn lookup(&self, locale: &str) -> Option<ExportMap> {
        let entries = self.entries.read();
        entries.get(locale).and_then(|entry| {
            if Instant::now() < entry.expires_at {
                Some(entry.export.clone())
            } else {
                None
            }
        })
    }

    /// Full-scan recomputation from the record store
    async fn compute(&self, locale: &str) -> Result<ExportMap, StoreError> {
        let translations = self.repo.list_translations().await?;

        Ok(translations
            .into_iter()
            .map(|record| {
                let text = record.content.get(locale).cloned();
                (record.key, text)
            })
            .collect())
    }
}

impl Clone for ExportCache {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            ttl: self.ttl,
            entries: self.entries.clone(),
        }
    }
}
