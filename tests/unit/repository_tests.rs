/*!
 * Tests for the SQLite-backed record store
 */

use anyhow::Result;
use lingostore::database::models::TranslationFilter;
use lingostore::StoreError;
use crate::common;

/// Test creating and fetching a translation by key
#[tokio::test]
async fn test_createTranslation_thenFindByKey_shouldReturnRecord() -> Result<()> {
    let repo = common::create_repository()?;

    let created = repo
        .create_translation("welcome", &common::content(&[("en", "Welcome")]))
        .await?;
    let found = repo.find_by_key("welcome").await?;

    let found = found.expect("record should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.content.get("en").map(String::as_str), Some("Welcome"));
    Ok(())
}

/// Test that creating a second translation with the same key is rejected
#[tokio::test]
async fn test_createTranslation_withDuplicateKey_shouldFail() -> Result<()> {
    let repo = common::create_repository()?;
    repo.create_translation("welcome", &common::content(&[("en", "Welcome")]))
        .await?;

    let result = repo
        .create_translation("welcome", &common::content(&[("fr", "Bienvenue")]))
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateKey(key)) if key == "welcome"));
    Ok(())
}

/// Test that updating content replaces the whole locale map
#[tokio::test]
async fn test_updateContent_shouldReplaceNotMerge() -> Result<()> {
    let repo = common::create_repository()?;
    let created = repo
        .create_translation(
            "welcome",
            &common::content(&[("en", "Welcome"), ("fr", "Bienvenue")]),
        )
        .await?;

    let updated = repo
        .update_content(created.id, &common::content(&[("en", "Hello")]))
        .await?;

    assert_eq!(updated.content.get("en").map(String::as_str), Some("Hello"));
    assert!(!updated.content.contains_key("fr"));
    Ok(())
}

/// Test tag creation by slug with first-write-wins display names
#[tokio::test]
async fn test_findOrCreateTag_shouldKeepFirstDisplayName() -> Result<()> {
    let repo = common::create_repository()?;

    let first = repo.find_or_create_tag("web", "Web").await?;
    let second = repo.find_or_create_tag("web", "WEB frontend").await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Web");
    Ok(())
}

/// Test the tag filter of the listing query
#[tokio::test]
async fn test_queryTranslations_withTagFilter_shouldMatchExactSlug() -> Result<()> {
    let repo = common::create_repository()?;
    let tagged = repo
        .create_translation("welcome", &common::content(&[("en", "Welcome")]))
        .await?;
    repo.create_translation("farewell", &common::content(&[("en", "Goodbye")]))
        .await?;
    let tag = repo.find_or_create_tag("web", "Web").await?;
    repo.set_tag_associations(tagged.id, vec![tag.id]).await?;

    let filter = TranslationFilter {
        tag: Some("web".to_string()),
        ..Default::default()
    };
    let page = repo.query_translations(&filter, 1, 50).await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].key, "welcome");
    Ok(())
}

/// Test pagination boundaries of the listing query
#[tokio::test]
async fn test_queryTranslations_shouldPaginate() -> Result<()> {
    let repo = common::create_repository()?;
    for i in 0..5 {
        repo.create_translation(&format!("key-{}", i), &common::content(&[("en", "text")]))
            .await?;
    }

    let filter = TranslationFilter::default();
    let first = repo.query_translations(&filter, 1, 2).await?;
    let last = repo.query_translations(&filter, 3, 2).await?;
    let beyond = repo.query_translations(&filter, 4, 2).await?;

    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 5);
    assert_eq!(last.items.len(), 1);
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 5);
    Ok(())
}
