use std::sync::Arc;

use anyhow::Result;
use employees_tests::PgFixture;
use entity::employees::{Changes, Draft};
use platform_db::{DbError, EmployeeStore};
use products_hr::{EmployeeService, HrError};
use testcontainers::clients::Cli;
use uuid::Uuid;

#[tokio::test]
async fn employee_persistence_on_postgres() -> Result<()> {
    let docker = Cli::default();
    let pg = PgFixture::start(&docker).await?;

    save_assigns_ids_and_lists_all(&pg).await?;
    pg.reset().await?;
    lookups_by_email_and_name(&pg).await?;
    pg.reset().await?;
    overwrite_and_delete(&pg).await?;
    pg.reset().await?;
    unique_email_is_enforced_by_schema(&pg).await?;
    pg.reset().await?;
    concurrent_creates_admit_one(&pg).await?;
    pg.reset().await?;
    deleted_email_can_be_reused(&pg).await?;
    Ok(())
}

async fn save_assigns_ids_and_lists_all(pg: &PgFixture<'_>) -> Result<()> {
    let store = pg.store();
    let ramesh = store
        .save(None, Draft::new("Ramesh", "Ramesh", "ramesh@gmail.com"))
        .await?;
    assert!(ramesh.id > 0);

    let jhon = store
        .save(None, Draft::new("Jhon", "Joe", "joe@gmail.com"))
        .await?;
    assert!(jhon.id > ramesh.id);

    assert_eq!(store.find_all().await?, vec![ramesh, jhon]);
    Ok(())
}

async fn lookups_by_email_and_name(pg: &PgFixture<'_>) -> Result<()> {
    let store = pg.store();
    let saved = store
        .save(None, Draft::new("Ramesh", "Fadatare", "ramesh@gmail.com"))
        .await?;
    store
        .save(None, Draft::new("Ramesh", "Fadatare", "ramesh.f@gmail.com"))
        .await?;

    assert_eq!(
        store.find_by_email("ramesh@gmail.com").await?,
        Some(saved.clone())
    );
    assert_eq!(store.find_by_email("RAMESH@gmail.com").await?, None);
    assert_eq!(
        store
            .find_by_first_and_last_name("Ramesh", "Fadatare")
            .await?,
        Some(saved)
    );
    assert_eq!(
        store.find_by_first_and_last_name("Ramesh", "Nobody").await?,
        None
    );
    Ok(())
}

async fn overwrite_and_delete(pg: &PgFixture<'_>) -> Result<()> {
    let store = pg.store();
    let saved = store
        .save(None, Draft::new("Ramesh", "Fadatare", "ramesh@gmail.com"))
        .await?;

    let updated = store
        .save(
            Some(saved.id),
            Draft::new("Ram", "Fadatare", "ram@gmail.com"),
        )
        .await?;
    assert_eq!(updated.id, saved.id);
    assert_eq!(store.find_by_id(saved.id).await?, Some(updated));

    assert!(matches!(
        store.save(Some(saved.id + 1000), Draft::new("A", "B", "c@d.e")).await,
        Err(DbError::RecordMissing(_))
    ));

    store.delete_by_id(saved.id).await?;
    assert_eq!(store.find_by_id(saved.id).await?, None);
    store.delete_by_id(saved.id).await?;
    Ok(())
}

async fn unique_email_is_enforced_by_schema(pg: &PgFixture<'_>) -> Result<()> {
    let store = pg.store();
    store
        .save(None, Draft::new("Suresh", "basya", "suresh@gmail.com"))
        .await?;
    let err = store
        .save(None, Draft::new("Other", "Person", "suresh@gmail.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation(_)), "got {err:?}");
    assert_eq!(store.find_all().await?.len(), 1);
    Ok(())
}

async fn concurrent_creates_admit_one(pg: &PgFixture<'_>) -> Result<()> {
    let service = EmployeeService::new(Arc::new(pg.store()));
    let email = format!("race-{}@example.com", Uuid::new_v4().simple());
    let draft = Draft::new("Race", "Condition", email.clone());

    let (left, right) = tokio::join!(
        service.create_employee(draft.clone()),
        service.create_employee(draft),
    );
    let outcomes = [left, right];
    let created = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| matches!(r, Err(HrError::DuplicateResource { .. })))
        .count();
    assert_eq!((created, duplicates), (1, 1));
    assert_eq!(service.list_employees().await?.len(), 1);
    Ok(())
}

async fn deleted_email_can_be_reused(pg: &PgFixture<'_>) -> Result<()> {
    let service = EmployeeService::new(Arc::new(pg.store()));
    let first = service
        .create_employee(Draft::new("Undertaker", "Bob", "undertaker@gmail.com"))
        .await?;
    service.delete_employee(first.id).await?;

    let second = service
        .create_employee(Draft::new("Undertaker", "cina", "undertaker@gmail.com"))
        .await?;
    assert_ne!(second.id, first.id);

    let renamed = service
        .update_employee(
            second.id,
            Changes {
                last_name: Some("Calaway".into()),
                ..Changes::default()
            },
        )
        .await?;
    assert_eq!(renamed.last_name, "Calaway");
    assert_eq!(renamed.email, "undertaker@gmail.com");
    Ok(())
}
