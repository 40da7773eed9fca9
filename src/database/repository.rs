/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all record store operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{LocaleMap, Page, TagRecord, TranslationFilter, TranslationRecord};
use crate::errors::StoreError;

/// Repository for record store operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    // =========================================================================
    // Translation Operations
    // =========================================================================

    /// Persist a new translation
    ///
    /// Fails with `DuplicateKey` when the key is already taken, leaving the
    /// existing record unmodified. The existence check and the insert run
    /// under the same connection lock.
    pub async fn create_translation(
        &self,
        key: &str,
        content: &LocaleMap,
    ) -> Result<TranslationRecord, StoreError> {
        let record = TranslationRecord::new(key.to_string(), content.clone());
        let content_json = serde_json::to_string(content)
            .context("Failed to serialize translation content")?;

        let result = self
            .db
            .execute_async(move |conn| {
                let taken: bool = conn
                    .query_row(
                        "SELECT COUNT(*) FROM translations WHERE key = ?1",
                        [&record.key],
                        |row| row.get(0),
                    )
                    .map(|count: i64| count > 0)?;

                if taken {
                    return Err(StoreError::DuplicateKey(record.key.clone()).into());
                }

                conn.execute(
                    r#"
                    INSERT INTO translations (key, content, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                    params![record.key, content_json, record.created_at, record.updated_at],
                )?;

                let mut record = record;
                record.id = conn.last_insert_rowid();
                Ok(record)
            })
            .await?;

        debug!("Created translation '{}' (id {})", result.key, result.id);
        Ok(result)
    }

    /// Get a translation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TranslationRecord>, StoreError> {
        let record = self
            .db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT id, key, content, created_at, updated_at FROM translations WHERE id = ?1",
                        [id],
                        Self::parse_translation_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await?;

        Ok(record)
    }

    /// Get a translation by its unique key
    pub async fn find_by_key(&self, key: &str) -> Result<Option<TranslationRecord>, StoreError> {
        let key = key.to_string();

        let record = self
            .db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT id, key, content, created_at, updated_at FROM translations WHERE key = ?1",
                        [&key],
                        Self::parse_translation_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await?;

        Ok(record)
    }

    /// Replace a translation's content map
    ///
    /// Replace semantics: the new map fully overwrites the previous one.
    /// Fails with `NotFound` when the id does not exist.
    pub async fn update_content(
        &self,
        id: i64,
        content: &LocaleMap,
    ) -> Result<TranslationRecord, StoreError> {
        let content_json = serde_json::to_string(content)
            .context("Failed to serialize translation content")?;
        let now = chrono::Utc::now().to_rfc3339();

        let record = self
            .db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "UPDATE translations SET content = ?1, updated_at = ?2 WHERE id = ?3",
                    params![content_json, now, id],
                )?;

                if changed == 0 {
                    return Err(StoreError::NotFound(id).into());
                }

                let record = conn.query_row(
                    "SELECT id, key, content, created_at, updated_at FROM translations WHERE id = ?1",
                    [id],
                    Self::parse_translation_row,
                )?;
                Ok(record)
            })
            .await?;

        debug!("Updated content of translation '{}' (id {})", record.key, record.id);
        Ok(record)
    }

    /// Delete a translation; association rows cascade
    ///
    /// Fails with `NotFound` when the id does not exist. Deletion is
    /// immediate and permanent, there is no soft-delete.
    pub async fn delete_translation(&self, id: i64) -> Result<(), StoreError> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM translations WHERE id = ?1", [id])?;

                if deleted == 0 {
                    return Err(StoreError::NotFound(id).into());
                }
                Ok(())
            })
            .await?;

        debug!("Deleted translation id {}", id);
        Ok(())
    }

    /// Get all translations (for full-locale export recomputation)
    pub async fn list_translations(&self) -> Result<Vec<TranslationRecord>, StoreError> {
        let records = self
            .db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, key, content, created_at, updated_at FROM translations ORDER BY id",
                )?;

                let records: Vec<TranslationRecord> = stmt
                    .query_map([], Self::parse_translation_row)?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(records)
            })
            .await?;

        Ok(records)
    }

    // =========================================================================
    // Tag Operations
    // =========================================================================

    /// Get a tag by slug, creating it when absent
    ///
    /// The display name is only written on creation; later calls with a
    /// different default name leave the stored name untouched.
    pub async fn find_or_create_tag(
        &self,
        slug: &str,
        default_name: &str,
    ) -> Result<TagRecord, StoreError> {
        let slug = slug.to_string();
        let default_name = default_name.to_string();

        let tag = self
            .db
            .execute_async(move |conn| {
                if let Some(tag) = Self::find_tag_by_slug_sync(conn, &slug)? {
                    return Ok(tag);
                }

                let created_at = chrono::Utc::now().to_rfc3339();
                conn.execute(
                    "INSERT INTO tags (slug, name, created_at) VALUES (?1, ?2, ?3)",
                    params![slug, default_name, created_at],
                )?;

                debug!("Created tag '{}' ({})", slug, default_name);
                Ok(TagRecord {
                    id: conn.last_insert_rowid(),
                    slug,
                    name: default_name,
                    created_at,
                })
            })
            .await?;

        Ok(tag)
    }

    /// Look up a tag by slug (synchronous version for use within closures)
    fn find_tag_by_slug_sync(conn: &Connection, slug: &str) -> Result<Option<TagRecord>> {
        let result = conn
            .query_row(
                "SELECT id, slug, name, created_at FROM tags WHERE slug = ?1",
                [slug],
                |row| {
                    Ok(TagRecord {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                        name: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    /// Replace a translation's complete tag membership
    ///
    /// Runs as a single transaction: prior associations are removed and the
    /// given set becomes the full membership (not additive).
    pub async fn set_tag_associations(
        &self,
        translation_id: i64,
        tag_ids: Vec<i64>,
    ) -> Result<(), StoreError> {
        self.db
            .transaction_async(move |tx| {
                tx.execute(
                    "DELETE FROM translation_tags WHERE translation_id = ?1",
                    [translation_id],
                )?;

                for tag_id in tag_ids {
                    tx.execute(
                        "INSERT OR IGNORE INTO translation_tags (translation_id, tag_id) VALUES (?1, ?2)",
                        params![translation_id, tag_id],
                    )?;
                }
                Ok(())
            })
            .await?;

        Ok(())
    }

    /// Get the tags associated with a translation
    pub async fn tags_for_translation(&self, id: i64) -> Result<Vec<TagRecord>, StoreError> {
        let tags = self
            .db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT t.id, t.slug, t.name, t.created_at
                    FROM tags t
                    INNER JOIN translation_tags tt ON tt.tag_id = t.id
                    WHERE tt.translation_id = ?1
                    ORDER BY t.id
                    "#,
                )?;

                let tags: Vec<TagRecord> = stmt
                    .query_map([id], |row| {
                        Ok(TagRecord {
                            id: row.get(0)?,
                            slug: row.get(1)?,
                            name: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    })?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(tags)
            })
            .await?;

        Ok(tags)
    }

    // =========================================================================
    // Filtered Listing
    // =========================================================================

    /// Filtered, paginated listing; always live against the store
    ///
    /// Filters combine with logical AND. Key matching uses SQLite `LIKE`
    /// (case-insensitive for ASCII); the content filter only inspects the
    /// "en" value of the content document.
    pub async fn query_translations(
        &self,
        filter: &TranslationFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<TranslationRecord>, StoreError> {
        let page = page.max(1);

        let (where_clause, values) = if filter.is_empty() {
            (String::new(), Vec::new())
        } else {
            let mut conditions: Vec<&str> = Vec::new();
            let mut values: Vec<String> = Vec::new();

            if let Some(tag) = &filter.tag {
                conditions.push(
                    "EXISTS (SELECT 1 FROM translation_tags tt \
                     INNER JOIN tags tg ON tg.id = tt.tag_id \
                     WHERE tt.translation_id = translations.id AND tg.slug = ?)",
                );
                values.push(tag.clone());
            }
            if let Some(key) = &filter.key {
                conditions.push("key LIKE '%' || ? || '%'");
                values.push(key.clone());
            }
            if let Some(content) = &filter.content {
                conditions.push("json_extract(content, '$.en') LIKE '%' || ? || '%'");
                values.push(content.clone());
            }

            (format!(" WHERE {}", conditions.join(" AND ")), values)
        };

        // Offset in u64 so an out-of-range page cannot overflow
        let offset = u64::from(page - 1) * u64::from(per_page);

        let count_sql = format!("SELECT COUNT(*) FROM translations{}", where_clause);
        let select_sql = format!(
            "SELECT id, key, content, created_at, updated_at FROM translations{} \
             ORDER BY id LIMIT {} OFFSET {}",
            where_clause, per_page, offset,
        );

        let result = self
            .db
            .execute_async(move |conn| {
                let total: i64 = conn.query_row(
                    &count_sql,
                    params_from_iter(values.iter()),
                    |row| row.get(0),
                )?;

                let mut stmt = conn.prepare(&select_sql)?;
                let items: Vec<TranslationRecord> = stmt
                    .query_map(params_from_iter(values.iter()), Self::parse_translation_row)?
                    .filter_map(|r| r.ok())
                    .collect();

                Ok(Page {
                    items,
                    page,
                    per_page,
                    total,
                })
            })
            .await?;

        Ok(result)
    }

    /// Parse a translation row including its embedded content document
    fn parse_translation_row(row: &rusqlite::Row) -> rusqlite::Result<TranslationRecord> {
        let content_json: String = row.get(2)?;
        Ok(TranslationRecord {
            id: row.get(0)?,
            key: row.get(1)?,
            content: serde_json::from_str(&content_json).unwrap_or_default(),
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}
