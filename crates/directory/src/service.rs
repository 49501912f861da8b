//! Owner-scoped invariant protocol shared by departments and employees.
//!
//! Every check runs before the write and is scoped to the principal's
//! owner id. The checks are not atomic with the write: two concurrent
//! requests can both pass them. Stores enforce the same uniqueness rules
//! and report violations as [`StoreError::Conflict`](crate::StoreError), so
//! the race still ends in `Conflict`.

use std::sync::Arc;

use tracing::{debug, info};

use workforce_auth::Principal;
use workforce_core::{AppError, AppResult, DepartmentId, Merge, Page};

use crate::department::Department;
use crate::ports::ResourceStore;
use crate::resource::Resource;

pub struct ResourceService<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
    departments: Option<Arc<dyn ResourceStore<Department>>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            departments: self.departments.clone(),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>) -> Self {
        Self {
            store,
            departments: None,
        }
    }

    /// Department store used for referential checks.
    pub fn with_departments(mut self, departments: Arc<dyn ResourceStore<Department>>) -> Self {
        self.departments = Some(departments);
        self
    }

    pub async fn create(&self, principal: &Principal, draft: R::Draft) -> AppResult<R::Record> {
        let owner = principal.owner();

        if let Some(key) = R::draft_key(&draft) {
            if self.store.exists(owner, key).await? {
                debug!(owner_id = %owner, %key, kind = %R::KIND, "create rejected: duplicate key");
                return Err(AppError::conflict(R::KIND.duplicate()));
            }
        }
        if let Some(department_id) = R::draft_reference(&draft) {
            self.ensure_department(principal, department_id).await?;
        }

        let record = self.store.create(owner, draft).await?;
        info!(owner_id = %owner, key = %R::key(&record), kind = %R::KIND, "created");
        Ok(record)
    }

    pub async fn update(&self, principal: &Principal, key: &R::Key, patch: R::Patch) -> AppResult<R::Record> {
        let owner = principal.owner();

        let existing = self.store.find(owner, key).await?.ok_or_else(|| {
            debug!(owner_id = %owner, %key, kind = %R::KIND, "update rejected: not found");
            AppError::not_found(R::KIND.not_found())
        })?;

        if let Some(new_key) = R::patch_key(&patch) {
            if new_key != key && self.store.exists(owner, new_key).await? {
                debug!(owner_id = %owner, %key, %new_key, kind = %R::KIND, "update rejected: duplicate key");
                return Err(AppError::conflict(R::KIND.duplicate()));
            }
        }
        if let Some(department_id) = R::patch_reference(&patch) {
            self.ensure_department(principal, department_id).await?;
        }

        let merged = existing.merge(&patch);
        let record = self.store.update(owner, key, merged).await?;
        info!(owner_id = %owner, %key, kind = %R::KIND, "updated");
        Ok(record)
    }

    pub async fn delete(&self, principal: &Principal, key: &R::Key) -> AppResult<()> {
        let owner = principal.owner();

        if !self.store.exists(owner, key).await? {
            debug!(owner_id = %owner, %key, kind = %R::KIND, "delete rejected: not found");
            return Err(AppError::not_found(R::KIND.not_found()));
        }
        if self.store.exists_referencing(owner, key).await? {
            debug!(owner_id = %owner, %key, kind = %R::KIND, "delete rejected: still referenced");
            return Err(AppError::conflict(R::KIND.still_referenced()));
        }

        self.store.delete(owner, key).await?;
        info!(owner_id = %owner, %key, kind = %R::KIND, "deleted");
        Ok(())
    }

    /// Owner-scoped listing. An unsatisfiable filter yields an empty page.
    pub async fn list(&self, principal: &Principal, filter: R::Filter, page: Page) -> AppResult<Vec<R::Record>> {
        if R::filter_is_unsatisfiable(&filter) {
            debug!(owner_id = %principal.owner(), kind = %R::KIND, "list short-circuited: unsatisfiable filter");
            return Ok(Vec::new());
        }
        Ok(self.store.list(principal.owner(), &filter, page).await?)
    }

    async fn ensure_department(&self, principal: &Principal, department_id: DepartmentId) -> AppResult<()> {
        let departments = self
            .departments
            .as_ref()
            .ok_or_else(|| AppError::internal(format!("{} service has no department store", R::KIND)))?;

        if !departments.exists(principal.owner(), &department_id).await? {
            debug!(
                owner_id = %principal.owner(),
                %department_id,
                kind = %R::KIND,
                "write rejected: department not in scope"
            );
            return Err(AppError::not_found(R::KIND.reference_missing()));
        }
        Ok(())
    }
}

pub type DepartmentService = ResourceService<Department>;
pub type EmployeeService = ResourceService<crate::employee::Employee>;
