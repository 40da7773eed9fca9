/*!
 * Application controller bridging the CLI surface to the translation service.
 *
 * The controller wires the record store, export cache, and service together
 * from a loaded configuration and renders every response as JSON, keeping
 * the CLI layer a thin request/response mapping.
 */

use anyhow::{Context, Result};
use log::info;

use crate::app_config::Config;
use crate::database::connection::DatabaseConnection;
use crate::database::models::{LocaleMap, TranslationFilter};
use crate::database::Repository;
use crate::errors::StoreError;
use crate::export_cache::ExportCache;
use crate::translation_service::TranslationService;

/// Main application controller
pub struct Controller {
    /// Translation service orchestrating mutations and exports
    service: TranslationService,
    /// Database connection kept for statistics reporting
    db: DatabaseConnection,
}

impl Controller {
    /// Create a controller from the application configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };

        let repo = Repository::new(db.clone());
        let export_cache = ExportCache::with_ttl(repo.clone(), config.export_ttl());
        let service =
            TranslationService::new(repo, export_cache).with_page_size(config.page_size);

        Ok(Self { service, db })
    }

    /// Create a translation from CLI arguments
    pub async fn create(
        &self,
        key: &str,
        content_json: &str,
        tags: Vec<String>,
    ) -> Result<String> {
        let content = parse_content(content_json)?;
        let created = self.service.create(key, &content, &tags).await?;

        info!("Created translation '{}'", created.record.key);
        to_json(&created)
    }

    /// Update a translation's content and/or tags
    pub async fn update(
        &self,
        id: i64,
        content_json: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<String> {
        let content = match content_json {
            Some(raw) => Some(parse_content(&raw)?),
            None => None,
        };
        let updated = self.service.update(id, content, tags).await?;

        info!("Updated translation '{}'", updated.record.key);
        to_json(&updated)
    }

    /// Delete a translation
    pub async fn delete(&self, id: i64) -> Result<String> {
        self.service.delete(id).await?;
        to_json(&serde_json::json!({ "message": "Deleted" }))
    }

    /// Show a single translation with its tags
    pub async fn show(&self, id: i64) -> Result<String> {
        let shown = self.service.show(id).await?;
        to_json(&shown)
    }

    /// List translations with optional filters
    pub async fn list(
        &self,
        tag: Option<String>,
        key: Option<String>,
        content: Option<String>,
        page: u32,
    ) -> Result<String> {
        let filter = TranslationFilter { tag, key, content };
        let page = self.service.list(&filter, page).await?;
        to_json(&page)
    }

    /// Export the key -> text mapping for a locale
    pub async fn export(&self, locale: &str) -> Result<String> {
        let export = self.service.export_locale(locale).await?;
        to_json(&export)
    }

    /// Render database statistics
    pub fn stats(&self) -> Result<String> {
        let stats = self.db.stats()?;
        Ok(stats.to_string())
    }
}

/// Parse the CLI content argument as a locale -> text JSON object
fn parse_content(raw: &str) -> Result<LocaleMap, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        StoreError::Validation(format!(
            "content must be a JSON object mapping locale to text: {}",
            e
        ))
    })
}

/// Serialize a response value as pretty JSON
fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize response")
}
