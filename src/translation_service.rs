/*!
 * Translation service: record mutations and cache invalidation.
 *
 * This module orchestrates translation create/update/delete, resolves tag
 * labels to shared tags, and drives export cache invalidation as a side
 * effect of every mutation. Invalidation is synchronous: the cache entry for
 * every affected locale is dropped before the mutation is acknowledged.
 */

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::database::models::{LocaleMap, Page, TagRecord, TranslationFilter, TranslationRecord};
use crate::database::Repository;
use crate::errors::StoreError;
use crate::export_cache::{ExportCache, ExportMap};
use crate::slug::{display_name, slugify};

/// Default page size for the filtered listing path
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Translation together with its resolved tag set
#[derive(Debug, Clone, Serialize)]
pub struct TranslationWithTags {
    /// The translation record
    #[serde(flatten)]
    pub record: TranslationRecord,
    /// Associated tags
    pub tags: Vec<TagRecord>,
}

/// Service layer over the record store and export cache
#[derive(Clone)]
pub struct TranslationService {
    /// Record store handle
    repo: Repository,

    /// Shared export cache; constructed once and passed in by the caller so
    /// tests can isolate their own instance
    export_cache: ExportCache,

    /// Page size for `list`
    page_size: u32,
}

impl TranslationService {
    /// Create a service over an existing repository and export cache
    pub fn new(repo: Repository, export_cache: ExportCache) -> Self {
        Self {
            repo,
            export_cache,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Create a service with a fresh export cache over the repository
    pub fn with_repository(repo: Repository) -> Self {
        let export_cache = ExportCache::new(repo.clone());
        Self::new(repo, export_cache)
    }

    /// Override the listing page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Create a translation with a unique key, content, and tag labels
    ///
    /// Fails with `DuplicateKey` if the key exists and `Validation` on a
    /// blank key or empty content. Invalidates the export cache for every
    /// locale present in the content before returning.
    pub async fn create(
        &self,
        key: &str,
        content: &LocaleMap,
        tag_labels: &[String],
    ) -> Result<TranslationWithTags, StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::missing_key());
        }
        if content.is_empty() {
            return Err(StoreError::empty_content());
        }

        // Labels are the last fallible input; resolve them before the insert
        // so a bad label leaves no half-created record behind.
        let tags = self.resolve_tags(tag_labels).await?;

        let record = self.repo.create_translation(key, content).await?;
        let tag_ids: Vec<i64> = tags.iter().map(|tag| tag.id).collect();
        self.repo.set_tag_associations(record.id, tag_ids).await?;

        self.invalidate_locales(record.locales());

        Ok(TranslationWithTags { record, tags })
    }

    /// Partially update a translation's content and/or tags
    ///
    /// Content uses replace semantics: the supplied map fully overwrites the
    /// previous one. Tags, when supplied, replace the full membership;
    /// omitted labels are detached. Supplying neither is a no-op write.
    /// When content changes, the union of old and new locale keys is
    /// invalidated so that a locale dropped from the content does not serve
    /// a stale export until TTL expiry.
    pub async fn update(
        &self,
        id: i64,
        content: Option<LocaleMap>,
        tag_labels: Option<Vec<String>>,
    ) -> Result<TranslationWithTags, StoreError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        if let Some(new_content) = &content {
            if new_content.is_empty() {
                return Err(StoreError::empty_content());
            }
        }

        // Resolve labels before the content write; once `update_content` has
        // committed, no path may return without invalidating its locales.
        let resolved = match tag_labels {
            Some(labels) => Some(self.resolve_tags(&labels).await?),
            None => None,
        };

        let record = match &content {
            Some(new_content) => self.repo.update_content(id, new_content).await?,
            None => existing.clone(),
        };

        let tags = match resolved {
            Some(tags) => {
                let tag_ids: Vec<i64> = tags.iter().map(|tag| tag.id).collect();
                self.repo.set_tag_associations(id, tag_ids).await?;
                tags
            }
            None => self.repo.tags_for_translation(id).await?,
        };

        if content.is_some() {
            let affected: BTreeSet<String> = existing
                .locales()
                .into_iter()
                .chain(record.locales())
                .collect();
            self.invalidate_locales(affected);
        }

        Ok(TranslationWithTags { record, tags })
    }

    /// Delete a translation and its tag associations
    ///
    /// The export cache is invalidated for every locale of the pre-delete
    /// content before the record is removed, while that content is still
    /// known.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        self.invalidate_locales(existing.locales());
        self.repo.delete_translation(id).await?;

        debug!("Deleted translation '{}' (id {})", existing.key, id);
        Ok(())
    }

    /// Get a single translation with its tags
    pub async fn show(&self, id: i64) -> Result<TranslationWithTags, StoreError> {
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        let tags = self.repo.tags_for_translation(record.id).await?;

        Ok(TranslationWithTags { record, tags })
    }

    /// Filtered, paginated listing; never served from the cache
    pub async fn list(
        &self,
        filter: &TranslationFilter,
        page: u32,
    ) -> Result<Page<TranslationWithTags>, StoreError> {
        let result = self
            .repo
            .query_translations(filter, page, self.page_size)
            .await?;

        let mut tag_sets = Vec::with_capacity(result.items.len());
        for record in &result.items {
            tag_sets.push(self.repo.tags_for_translation(record.id).await?);
        }

        let mut tag_sets = tag_sets.into_iter();
        Ok(result.map(|record| TranslationWithTags {
            record,
            tags: tag_sets.next().unwrap_or_default(),
        }))
    }

    /// Export the key -> text mapping for one locale (read-through cached)
    pub async fn export_locale(&self, locale: &str) -> Result<ExportMap, StoreError> {
        self.export_cache.get(locale).await
    }

    /// Resolve tag labels to tags via get-or-create on the derived slug
    ///
    /// Labels that normalize to the same slug collapse into one tag; order
    /// of first occurrence is preserved.
    async fn resolve_tags(&self, labels: &[String]) -> Result<Vec<TagRecord>, StoreError> {
        let mut tags: Vec<TagRecord> = Vec::with_capacity(labels.len());

        for label in labels {
            let slug = slugify(label);
            if slug.is_empty() {
                return Err(StoreError::TagResolution(format!(
                    "label '{}' contains no usable characters",
                    label
                )));
            }

            let tag = self.repo.find_or_create_tag(&slug, &display_name(label)).await?;
            if !tags.iter().any(|existing| existing.id == tag.id) {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    /// Invalidate the export cache for each of the given locales
    fn invalidate_locales<I, S>(&self, locales: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for locale in locales {
            self.export_cache.invalidate(locale.as_ref());
        }
    }
}
