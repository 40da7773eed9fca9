/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-locale content of a translation: locale code -> text
pub type LocaleMap = HashMap<String, String>;

/// Translation record with its per-locale content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Database ID
    pub id: i64,
    /// Globally unique key, immutable after creation
    pub key: String,
    /// Locale code -> text mapping, stored as an embedded JSON document
    pub content: LocaleMap,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl TranslationRecord {
    /// Create a new translation record (without database ID)
    pub fn new(key: String, content: LocaleMap) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0, // Will be assigned by database
            key,
            content,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Locale codes present in this translation's content
    pub fn locales(&self) -> Vec<String> {
        self.content.keys().cloned().collect()
    }
}

/// Tag record shared by many translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Database ID
    pub id: i64,
    /// Unique slug derived from the first-seen label
    pub slug: String,
    /// Display name, fixed on first creation
    pub name: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

/// Combinable filters for the live listing path (logical AND)
#[derive(Debug, Clone, Default)]
pub struct TranslationFilter {
    /// Exact match against any associated tag slug
    pub tag: Option<String>,
    /// Case-insensitive substring match against the key
    pub key: Option<String>,
    /// Substring match against the "en" content value only
    pub content: Option<String>,
}

impl TranslationFilter {
    /// Whether no filter condition is set
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.key.is_none() && self.content.is_none()
    }
}

/// One page of query results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Fixed page size
    pub per_page: u32,
    /// Total number of matching records across all pages
    pub total: i64,
}

impl<T> Page<T> {
    /// Map the items of this page, keeping the pagination envelope
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
