use async_trait::async_trait;
use entity::employees::{self, Draft, Model};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::debug;

use crate::{DbError, DbPool, DbResult};

/// Persistence port for employee rows.
///
/// Lookups report absence as `None`; only infrastructure failures are errors.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert `draft` when `id` is `None`, otherwise overwrite the row with that id.
    async fn save(&self, id: Option<i64>, draft: Draft) -> DbResult<Model>;

    /// Every row, lowest id first.
    async fn find_all(&self) -> DbResult<Vec<Model>>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Model>>;

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Model>>;

    /// Exact match on both names. When several rows match, the lowest id wins.
    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> DbResult<Option<Model>>;

    /// Removing a missing id is not an error.
    async fn delete_by_id(&self, id: i64) -> DbResult<()>;

    /// Returns the number of rows removed.
    async fn delete_all(&self) -> DbResult<u64>;
}

/// [`EmployeeStore`] backed by the `employees` table.
#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeStore {
    pool: DbPool,
}

impl SeaOrmEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmEmployeeStore {
    async fn save(&self, id: Option<i64>, draft: Draft) -> DbResult<Model> {
        let Some(id) = id else {
            let model = employees::ActiveModel {
                id: NotSet,
                first_name: Set(draft.first_name),
                last_name: Set(draft.last_name),
                email: Set(draft.email),
            }
            .insert(&self.pool)
            .await?;
            debug!(employee_id = model.id, "employee inserted");
            return Ok(model);
        };

        let model = employees::ActiveModel {
            id: Unchanged(id),
            first_name: Set(draft.first_name),
            last_name: Set(draft.last_name),
            email: Set(draft.email),
        }
        .update(&self.pool)
        .await
        .map_err(|err| match err {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => DbError::RecordMissing(id),
            other => other.into(),
        })?;
        debug!(employee_id = id, "employee overwritten");
        Ok(model)
    }

    async fn find_all(&self) -> DbResult<Vec<Model>> {
        Ok(employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Model>> {
        Ok(employees::Entity::find_by_id(id).one(&self.pool).await?)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Model>> {
        Ok(employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    async fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> DbResult<Option<Model>> {
        Ok(employees::Entity::find()
            .filter(employees::Column::FirstName.eq(first_name))
            .filter(employees::Column::LastName.eq(last_name))
            .order_by_asc(employees::Column::Id)
            .one(&self.pool)
            .await?)
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = employees::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        debug!(employee_id = id, rows = result.rows_affected, "employee delete");
        Ok(())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = employees::Entity::delete_many().exec(&self.pool).await?;
        Ok(result.rows_affected)
    }
}
