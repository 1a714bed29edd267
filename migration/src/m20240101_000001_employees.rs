use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::Email).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        // Backs the service-level email check so concurrent creates cannot both win.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ux_employees_email")
                    .table(Employees::Table)
                    .col(Employees::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Migrator;
    use sea_orm_migration::sea_orm::{ConnectionTrait, Database, Statement};

    #[tokio::test]
    async fn up_then_down_leaves_no_table() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            "INSERT INTO employees (first_name, last_name, email) VALUES ('Jhon', 'Joe', 'joe@gmail.com')"
                .to_owned(),
        ))
        .await
        .unwrap();
        let duplicate = db
            .execute(Statement::from_string(
                backend,
                "INSERT INTO employees (first_name, last_name, email) VALUES ('Ram', 'R', 'joe@gmail.com')"
                    .to_owned(),
            ))
            .await;
        assert!(duplicate.is_err(), "email must be unique");

        Migrator::down(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        assert!(!manager.has_table("employees").await.unwrap());
    }
}
