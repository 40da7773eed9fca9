/*!
 * End-to-end tests for tagging and filtered listing
 */

use anyhow::Result;
use lingostore::{StoreError, TranslationFilter};
use crate::common;

/// Test that labels normalizing to one slug collapse into one tag
#[tokio::test]
async fn test_create_withEquivalentLabels_shouldCollapseToOneTag() -> Result<()> {
    let service = common::create_service()?;

    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["Landing Page", "landing-page", "LANDING  PAGE"]),
        )
        .await?;

    assert_eq!(created.tags.len(), 1);
    assert_eq!(created.tags[0].slug, "landing-page");
    assert_eq!(created.tags[0].name, "Landing Page");
    Ok(())
}

/// Test that tags are shared across translations
#[tokio::test]
async fn test_create_withExistingSlug_shouldReuseTag() -> Result<()> {
    let service = common::create_service()?;

    let first = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web"]),
        )
        .await?;
    let second = service
        .create(
            "farewell",
            &common::content(&[("en", "Goodbye")]),
            &common::tags(&["Web"]),
        )
        .await?;

    assert_eq!(first.tags[0].id, second.tags[0].id);
    Ok(())
}

/// Test full tag membership replacement on update
#[tokio::test]
async fn test_update_withTags_shouldReplaceMembership() -> Result<()> {
    let service = common::create_service()?;
    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web", "ui"]),
        )
        .await?;

    let updated = service
        .update(created.record.id, None, Some(common::tags(&["mobile"])))
        .await?;

    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].slug, "mobile");
    Ok(())
}

/// Test that omitting tags on update leaves the membership untouched
#[tokio::test]
async fn test_update_withoutTags_shouldKeepMembership() -> Result<()> {
    let service = common::create_service()?;
    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web"]),
        )
        .await?;

    let updated = service
        .update(
            created.record.id,
            Some(common::content(&[("en", "Hello")])),
            None,
        )
        .await?;

    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].slug, "web");
    Ok(())
}

/// Test that an empty tag list on update detaches everything
#[tokio::test]
async fn test_update_withEmptyTagList_shouldDetachAll() -> Result<()> {
    let service = common::create_service()?;
    let created = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web"]),
        )
        .await?;

    let updated = service
        .update(created.record.id, None, Some(Vec::new()))
        .await?;

    assert!(updated.tags.is_empty());
    Ok(())
}

/// Test that a label with no usable characters is rejected without a write
#[tokio::test]
async fn test_create_withUnusableLabel_shouldFailWithoutPersisting() -> Result<()> {
    let service = common::create_service()?;

    let result = service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["!!!"]),
        )
        .await;

    assert!(matches!(result, Err(StoreError::TagResolution(_))));

    // Nothing was persisted, exports stay empty
    let export = service.export_locale("en").await?;
    assert!(export.is_empty());
    Ok(())
}

/// Test combining tag and key filters in the listing
#[tokio::test]
async fn test_list_withCombinedFilters_shouldApplyLogicalAnd() -> Result<()> {
    let service = common::create_service()?;
    service
        .create(
            "home.welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web"]),
        )
        .await?;
    service
        .create(
            "home.farewell",
            &common::content(&[("en", "Goodbye")]),
            &common::tags(&["web"]),
        )
        .await?;
    service
        .create(
            "app.welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["mobile"]),
        )
        .await?;

    let filter = TranslationFilter {
        tag: Some("web".to_string()),
        key: Some("welcome".to_string()),
        ..Default::default()
    };
    let page = service.list(&filter, 1).await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].record.key, "home.welcome");
    Ok(())
}

/// Test the content filter against the "en" locale value
#[tokio::test]
async fn test_list_withContentFilter_shouldMatchEnglishTextOnly() -> Result<()> {
    let service = common::create_service()?;
    service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome"), ("fr", "Bienvenue")]),
            &[],
        )
        .await?;
    service
        .create("farewell", &common::content(&[("en", "Goodbye")]), &[])
        .await?;

    let matching = service
        .list(
            &TranslationFilter {
                content: Some("Welcome".to_string()),
                ..Default::default()
            },
            1,
        )
        .await?;
    let non_english = service
        .list(
            &TranslationFilter {
                content: Some("Bienvenue".to_string()),
                ..Default::default()
            },
            1,
        )
        .await?;

    assert_eq!(matching.total, 1);
    assert_eq!(matching.items[0].record.key, "welcome");
    assert_eq!(non_english.total, 0);
    Ok(())
}

/// Test that listing attaches the tag set to every item
#[tokio::test]
async fn test_list_shouldAttachTags() -> Result<()> {
    let service = common::create_service()?;
    service
        .create(
            "welcome",
            &common::content(&[("en", "Welcome")]),
            &common::tags(&["web", "ui"]),
        )
        .await?;

    let page = service.list(&TranslationFilter::default(), 1).await?;

    assert_eq!(page.items.len(), 1);
    let slugs: Vec<&str> = page.items[0]
        .tags
        .iter()
        .map(|tag| tag.slug.as_str())
        .collect();
    assert_eq!(slugs, vec!["web", "ui"]);
    Ok(())
}
