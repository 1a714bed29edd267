//! HR vertical slice: the employee service and its error taxonomy.

use std::sync::Arc;

use entity::employees::{Changes, Draft, Model};
use platform_db::{DbError, EmployeeStore};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use entity::employees::Model as Employee;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee already exists with email {email}")]
    DuplicateResource { email: String },
    #[error("employee {id} not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Store(#[from] DbError),
}

pub type HrResult<T> = Result<T, HrError>;

/// Business operations over employee records. Stateless; clones share the store.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Persist a new employee. Fails with [`HrError::DuplicateResource`] and
    /// writes nothing when the email is already taken.
    #[instrument(name = "hr.create_employee", skip_all)]
    pub async fn create_employee(&self, draft: Draft) -> HrResult<Model> {
        if self.store.find_by_email(&draft.email).await?.is_some() {
            warn!("rejected employee with duplicate email");
            return Err(HrError::DuplicateResource { email: draft.email });
        }
        let email = draft.email.clone();
        let saved = self
            .store
            .save(None, draft)
            .await
            .map_err(|err| duplicate_or(err, email))?;
        info!(employee_id = saved.id, "employee created");
        Ok(saved)
    }

    #[instrument(name = "hr.list_employees", skip_all)]
    pub async fn list_employees(&self) -> HrResult<Vec<Model>> {
        Ok(self.store.find_all().await?)
    }

    #[instrument(name = "hr.get_employee", skip(self))]
    pub async fn get_employee_by_id(&self, id: i64) -> HrResult<Option<Model>> {
        Ok(self.store.find_by_id(id).await?)
    }

    #[instrument(name = "hr.find_employee_by_name", skip(self))]
    pub async fn find_by_name(&self, first_name: &str, last_name: &str) -> HrResult<Option<Model>> {
        Ok(self
            .store
            .find_by_first_and_last_name(first_name, last_name)
            .await?)
    }

    /// Apply `changes` to the employee with `id`. The id itself never changes.
    #[instrument(name = "hr.update_employee", skip(self, changes))]
    pub async fn update_employee(&self, id: i64, changes: Changes) -> HrResult<Model> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(HrError::NotFound { id })?;
        if changes.is_empty() {
            return Ok(current);
        }
        let merged = changes.apply(&current);
        let email = merged.email.clone();
        let saved = self
            .store
            .save(Some(id), merged)
            .await
            .map_err(|err| match err {
                DbError::RecordMissing(id) => HrError::NotFound { id },
                other => duplicate_or(other, email),
            })?;
        info!(employee_id = id, "employee updated");
        Ok(saved)
    }

    /// Idempotent: deleting an unknown id succeeds.
    #[instrument(name = "hr.delete_employee", skip(self))]
    pub async fn delete_employee(&self, id: i64) -> HrResult<()> {
        self.store.delete_by_id(id).await?;
        info!(employee_id = id, "employee deleted");
        Ok(())
    }
}

// The unique index catches creates that race past the lookup above.
fn duplicate_or(err: DbError, email: String) -> HrError {
    match err {
        DbError::UniqueViolation(_) => HrError::DuplicateResource { email },
        other => HrError::Store(other),
    }
}
