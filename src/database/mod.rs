/*!
 * Database module for persistent storage of translations and tags.
 *
 * This module provides SQLite-based persistence for:
 * - Translation records with per-locale content stored as an embedded JSON document
 * - Tags with deterministic slugs, shared across translations
 * - The translation/tag many-to-many association
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
