use super::*;

/// Tests listing summaries of stored templates.
///
/// Verifies that summaries come from the stored counts and are ordered newest first.
///
/// Expected: Ok with two summaries, newest first
#[tokio::test]
async fn lists_summaries_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    factory::template::TemplateFactory::new(db)
        .name("older")
        .role_count(2)
        .created_at(now - Duration::hours(1))
        .build()
        .await?;
    factory::template::TemplateFactory::new(db)
        .name("newer")
        .category_count(3)
        .channel_count(7)
        .created_at(now)
        .build()
        .await?;

    let repo = TemplateRepository::new(db);
    let summaries = repo.get_all_summaries().await?;

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "newer");
    assert_eq!(summaries[0].categories, 3);
    assert_eq!(summaries[0].channels, 7);
    assert_eq!(summaries[1].name, "older");
    assert_eq!(summaries[1].roles, 2);

    Ok(())
}

/// Tests listing an empty store.
///
/// Expected: Ok with no summaries
#[tokio::test]
async fn lists_nothing_when_empty() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TemplateRepository::new(db);

    assert!(repo.get_all_summaries().await?.is_empty());

    Ok(())
}
