/*!
 * # lingostore - Translation management with per-locale export caching
 *
 * A Rust library for managing localized text strings addressed by unique
 * keys, with tagging, filtered listing, and cached per-locale exports.
 *
 * ## Features
 *
 * - Create, update, and delete translations carrying content for multiple locales
 * - Tag translations for categorization; tags are resolved by slug and deduplicated
 * - Filtered, paginated listing by tag, key substring, or content substring
 * - Per-locale export maps served from a read-through, TTL-bounded cache
 * - Explicit cache invalidation on every write, before the write is acknowledged
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite-backed record store:
 *   - `database::connection`: Connection handling and async execution
 *   - `database::schema`: Versioned schema initialization
 *   - `database::repository`: Translation and tag persistence
 *   - `database::models`: Record and filter types
 * - `export_cache`: Read-through per-locale export cache
 * - `translation_service`: Write orchestration and cache invalidation
 * - `slug`: Tag label normalization
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod errors;
pub mod export_cache;
pub mod slug;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::models::{LocaleMap, Page, TagRecord, TranslationFilter, TranslationRecord};
pub use database::{DatabaseConnection, Repository};
pub use errors::StoreError;
pub use export_cache::{ExportCache, ExportMap, DEFAULT_EXPORT_TTL};
pub use translation_service::{TranslationService, TranslationWithTags, DEFAULT_PAGE_SIZE};
