/*!
 * End-to-end tests for the export caching workflow
 */

use std::time::Duration;

use anyhow::Result;
use lingostore::{ExportCache, Repository, StoreError, TranslationService};
use crate::common;

/// Test the full lifecycle: create, export, update, re-export
#[tokio::test]
async fn test_createUpdateExport_shouldReflectEveryWrite() -> Result<()> {
    let service = common::create_service()?;

    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome"), ("fr", "Bienvenue")]),
            &common::tags(&["web"]),
        )
        .await?;

    let export = service.export_locale("fr").await?;
    assert_eq!(export.get("welcome").unwrap().as_deref(), Some("Bienvenue"));

    // Invalidation makes the new content visible immediately, well before
    // the 60 second TTL would expire
    service
        .update(
            created.record.id,
            Some(common::content(&[("en", "Hello"), ("fr", "Salut")])),
            None,
        )
        .await?;

    let export = service.export_locale("fr").await?;
    assert_eq!(export.get("welcome").unwrap().as_deref(), Some("Salut"));
    Ok(())
}

/// Test that a locale dropped by an update stops being served stale
#[tokio::test]
async fn test_update_droppingLocale_shouldInvalidateOldLocale() -> Result<()> {
    let service = common::create_service()?;
    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome"), ("fr", "Bienvenue")]),
            &[],
        )
        .await?;
    service.export_locale("fr").await?;

    service
        .update(
            created.record.id,
            Some(common::content(&[("en", "Welcome")])),
            None,
        )
        .await?;

    let export = service.export_locale("fr").await?;
    assert_eq!(export.get("welcome").unwrap(), &None);
    Ok(())
}

/// Test that deleting a translation removes its key from exports
#[tokio::test]
async fn test_delete_shouldRemoveKeyFromExport() -> Result<()> {
    let service = common::create_service()?;
    let created = service
        .create("welcome", &common::content(&[("en", "Welcome")]), &[])
        .await?;
    service
        .create("farewell", &common::content(&[("en", "Goodbye")]), &[])
        .await?;
    service.export_locale("en").await?;

    service.delete(created.record.id).await?;

    let export = service.export_locale("en").await?;
    assert!(!export.contains_key("welcome"));
    assert!(export.contains_key("farewell"));
    Ok(())
}

/// Test that an expired entry is recomputed without any invalidation
#[tokio::test]
async fn test_export_afterTtlExpiry_shouldObserveDirectStoreWrite() -> Result<()> {
    let repo = common::create_repository()?;
    let cache = ExportCache::with_ttl(repo.clone(), Duration::from_millis(20));
    let service = TranslationService::new(repo.clone(), cache);

    let created = repo
        .create_translation("welcome", &common::content(&[("en", "Welcome")]))
        .await?;
    service.export_locale("en").await?;

    // Write through the repository, bypassing service-level invalidation
    repo.update_content(created.id, &common::content(&[("en", "Changed")]))
        .await?;
    tokio::time::sleep(Duration::from_millis(40)).await;

    let export = service.export_locale("en").await?;
    assert_eq!(export.get("welcome").unwrap().as_deref(), Some("Changed"));
    Ok(())
}

/// Test that two services sharing one cache observe each other's writes
#[tokio::test]
async fn test_export_withSharedCache_shouldSeeInvalidationFromOtherHandle() -> Result<()> {
    let repo = common::create_repository()?;
    let cache = ExportCache::new(repo.clone());
    let reader = TranslationService::new(repo.clone(), cache.clone());
    let writer = TranslationService::new(repo, cache);

    let created = writer
        .create("welcome", &common::content(&[("en", "Welcome")]), &[])
        .await?;
    reader.export_locale("en").await?;

    writer
        .update(
            created.record.id,
            Some(common::content(&[("en", "Hello")])),
            None,
        )
        .await?;

    let export = reader.export_locale("en").await?;
    assert_eq!(export.get("welcome").unwrap().as_deref(), Some("Hello"));
    Ok(())
}

/// Test exporting a locale no translation carries
#[tokio::test]
async fn test_export_withUnknownLocale_shouldListAllKeysAsNull() -> Result<()> {
    let service = common::create_service()?;
    service
        .create("welcome", &common::content(&[("en", "Welcome")]), &[])
        .await?;

    let export = service.export_locale("de").await?;

    assert_eq!(export.len(), 1);
    assert_eq!(export.get("welcome").unwrap(), &None);
    Ok(())
}

/// Test that deleting a missing translation reports not found
#[tokio::test]
async fn test_delete_withUnknownId_shouldFailNotFound() -> Result<()> {
    let service = common::create_service()?;

    let result = service.delete(999).await;

    assert!(matches!(result, Err(StoreError::NotFound(999))));
    Ok(())
}

/// Test that a repository is usable across service clones
#[tokio::test]
async fn test_service_cloned_shouldShareStoreAndCache() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let service = TranslationService::with_repository(repo);
    let clone = service.clone();

    service
        .create("welcome", &common::content(&[("en", "Welcome")]), &[])
        .await?;

    let export = clone.export_locale("en").await?;
    assert_eq!(export.get("welcome").unwrap().as_deref(), Some("Welcome"));
    Ok(())
}
