use super::*;

/// Tests loading a saved template.
///
/// Verifies that the loaded template is structurally equal to the one saved.
///
/// Expected: Ok(Some) with an equal template
#[tokio::test]
async fn loads_saved_template() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TemplateRepository::new(db);
    let template = sample_template("Source Guild");
    repo.save("snapshot_4242", &template).await?;

    let loaded = repo.find_by_name("snapshot_4242").await?;

    assert_eq!(loaded, Some(template));

    Ok(())
}

/// Tests loading a name that was never saved.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_name() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_template(db).await?;

    let repo = TemplateRepository::new(db);
    let loaded = repo.find_by_name("missing").await?;

    assert!(loaded.is_none());

    Ok(())
}

/// Tests loading a record written by the factory with a minimal payload.
///
/// Expected: Ok(Some) with empty structure lists
#[tokio::test]
async fn loads_minimal_payload() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::template::TemplateFactory::new(db)
        .name("minimal")
        .source_name("Old Guild")
        .build()
        .await?;

    let repo = TemplateRepository::new(db);
    let loaded = repo.find_by_name("minimal").await?.unwrap();

    assert_eq!(loaded.source_name, "Old Guild");
    assert!(loaded.roles.is_empty());
    assert_eq!(loaded.channel_count(), 0);

    Ok(())
}
