use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use workforce_core::{DepartmentId, Page, UserId};
use workforce_directory::{
    Department, DepartmentFilter, NewDepartment, Resource, ResourceStore, StoreError, StoreResult,
};

use super::{PostgresDirectory, decode_error, like_literal, map_sqlx_error};

fn department_from_row(row: &PgRow) -> StoreResult<Department> {
    let decode = |e| decode_error("department row", e);
    Ok(Department {
        id: DepartmentId::new(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        owner: UserId::new(row.try_get("user_id").map_err(decode)?),
    })
}

#[async_trait]
impl ResourceStore<Department> for PostgresDirectory {
    #[instrument(skip(self), err)]
    async fn exists(&self, owner: UserId, key: &DepartmentId) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM departments WHERE user_id = $1 AND id = $2)")
            .bind(owner.get())
            .bind(key.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("department_exists", e))
    }

    #[instrument(skip(self), err)]
    async fn find(&self, owner: UserId, key: &DepartmentId) -> StoreResult<Option<Department>> {
        sqlx::query("SELECT id, name, user_id FROM departments WHERE user_id = $1 AND id = $2")
            .bind(owner.get())
            .bind(key.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_department", e))?
            .as_ref()
            .map(department_from_row)
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn create(&self, owner: UserId, draft: NewDepartment) -> StoreResult<Department> {
        let row = sqlx::query(
            r#"
            INSERT INTO departments (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id
            "#,
        )
        .bind(&draft.name)
        .bind(owner.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_department", e))?;

        department_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn update(&self, owner: UserId, key: &DepartmentId, merged: Department) -> StoreResult<Department> {
        let row = sqlx::query(
            r#"
            UPDATE departments
            SET name = $1, updated_at = NOW()
            WHERE user_id = $2 AND id = $3
            RETURNING id, name, user_id
            "#,
        )
        .bind(&merged.name)
        .bind(owner.get())
        .bind(key.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_department", e))?
        .ok_or_else(|| StoreError::NotFound(Department::KIND.not_found().to_string()))?;

        department_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, owner: UserId, key: &DepartmentId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM departments WHERE user_id = $1 AND id = $2")
            .bind(owner.get())
            .bind(key.get())
            .execute(&self.pool)
            .await
            .map_err(|e| match map_sqlx_error("delete_department", e) {
                // The employees foreign key blocks the delete.
                StoreError::NotFound(_) => StoreError::Conflict(Department::KIND.still_referenced().to_string()),
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(Department::KIND.not_found().to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list(&self, owner: UserId, filter: &DepartmentFilter, page: Page) -> StoreResult<Vec<Department>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, user_id
            FROM departments
            WHERE user_id = $1
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%' ESCAPE '\')
            ORDER BY id
            OFFSET $3
            LIMIT $4
            "#,
        )
        .bind(owner.get())
        .bind(filter.name.as_deref().map(like_literal))
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_departments", e))?;

        rows.iter().map(department_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn exists_referencing(&self, owner: UserId, key: &DepartmentId) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE user_id = $1 AND department_id = $2)")
            .bind(owner.get())
            .bind(key.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("department_has_employees", e))
    }
}
