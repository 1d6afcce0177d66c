use super::*;

/// Tests saving a new template.
///
/// Verifies that the record carries the summary counts alongside the payload.
///
/// Expected: Ok with one record stored
#[tokio::test]
async fn saves_new_template() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TemplateRepository::new(db);
    let record = repo
        .save("snapshot_4242", &sample_template("Source Guild"))
        .await?;

    assert_eq!(record.name, "snapshot_4242");
    assert_eq!(record.source_guild_id, "4242");
    assert_eq!(record.role_count, 1);
    assert_eq!(record.category_count, 1);
    assert_eq!(record.channel_count, 2);
    assert_eq!(TemplateEntity::find().count(db).await?, 1);

    Ok(())
}

/// Tests saving under an existing name.
///
/// Verifies that the whole record is replaced rather than a second one added.
///
/// Expected: Ok with the later template stored
#[tokio::test]
async fn replaces_template_with_same_name() -> Result<(), AppError> {
    let test = TestBuilder::new().with_table(TemplateEntity).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TemplateRepository::new(db);
    repo.save("shared", &sample_template("First")).await?;

    let mut second = sample_template("Second");
    second.roles.clear();
    repo.save("shared", &second).await?;

    assert_eq!(TemplateEntity::find().count(db).await?, 1);
    let stored = repo.find_by_name("shared").await?.unwrap();
    assert_eq!(stored, second);

    let summaries = repo.get_all_summaries().await?;
    assert_eq!(summaries[0].source_name, "Second");
    assert_eq!(summaries[0].roles, 0);

    Ok(())
}
