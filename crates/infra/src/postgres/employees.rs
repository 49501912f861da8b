use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use workforce_core::{DepartmentId, Page, UserId};
use workforce_directory::{
    Employee, EmployeeFilter, Gender, IdentityNumber, NewEmployee, Resource, ResourceStore, StoreError,
    StoreResult,
};

use super::{PostgresDirectory, decode_error, like_literal, map_sqlx_error, with_cause};

const COLUMNS: &str = "identity_number, name, gender, department_id, employee_image_uri, user_id";

fn employee_from_row(row: &PgRow) -> StoreResult<Employee> {
    let decode = |e| decode_error("employee row", e);
    let gender: String = row.try_get("gender").map_err(decode)?;
    Ok(Employee {
        identity_number: IdentityNumber::new(row.try_get::<String, _>("identity_number").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        gender: gender
            .parse::<Gender>()
            .map_err(|e| decode_error("employee row", e))?,
        department_id: DepartmentId::new(row.try_get("department_id").map_err(decode)?),
        image_uri: row.try_get("employee_image_uri").map_err(decode)?,
        owner: UserId::new(row.try_get("user_id").map_err(decode)?),
    })
}

/// Classify constraint failures of employee writes with domain causes.
fn write_error(operation: &str, err: sqlx::Error) -> StoreError {
    match map_sqlx_error(operation, err) {
        conflict @ StoreError::Conflict(_) => with_cause(conflict, Employee::KIND.duplicate()),
        missing @ StoreError::NotFound(_) => with_cause(missing, Employee::KIND.reference_missing()),
        other => other,
    }
}

#[async_trait]
impl ResourceStore<Employee> for PostgresDirectory {
    #[instrument(skip(self), err)]
    async fn exists(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE user_id = $1 AND identity_number = $2)")
            .bind(owner.get())
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("employee_exists", e))
    }

    #[instrument(skip(self), err)]
    async fn find(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {COLUMNS} FROM employees WHERE user_id = $1 AND identity_number = $2");
        sqlx::query(&sql)
            .bind(owner.get())
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_employee", e))?
            .as_ref()
            .map(employee_from_row)
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn create(&self, owner: UserId, draft: NewEmployee) -> StoreResult<Employee> {
        // Insert only when the department belongs to the same owner.
        let sql = format!(
            r#"
            INSERT INTO employees (identity_number, name, gender, department_id, employee_image_uri, user_id)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE EXISTS (SELECT 1 FROM departments WHERE id = $4 AND user_id = $6)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(draft.identity_number.as_str())
            .bind(&draft.name)
            .bind(draft.gender.as_str())
            .bind(draft.department_id.get())
            .bind(&draft.image_uri)
            .bind(owner.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error("insert_employee", e))?
            .ok_or_else(|| StoreError::NotFound(Employee::KIND.reference_missing().to_string()))?;

        employee_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn update(&self, owner: UserId, key: &IdentityNumber, merged: Employee) -> StoreResult<Employee> {
        let sql = format!(
            r#"
            UPDATE employees
            SET identity_number = $1,
                name = $2,
                gender = $3,
                department_id = $4,
                employee_image_uri = $5,
                updated_at = NOW()
            WHERE user_id = $6
              AND identity_number = $7
              AND EXISTS (SELECT 1 FROM departments WHERE id = $4 AND user_id = $6)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(merged.identity_number.as_str())
            .bind(&merged.name)
            .bind(merged.gender.as_str())
            .bind(merged.department_id.get())
            .bind(&merged.image_uri)
            .bind(owner.get())
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error("update_employee", e))?
            .ok_or_else(|| StoreError::NotFound(Employee::KIND.not_found().to_string()))?;

        employee_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, owner: UserId, key: &IdentityNumber) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE user_id = $1 AND identity_number = $2")
            .bind(owner.get())
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_employee", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(Employee::KIND.not_found().to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list(&self, owner: UserId, filter: &EmployeeFilter, page: Page) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM employees
            WHERE user_id = $1
              AND ($2::text IS NULL OR identity_number ILIKE $2 || '%' ESCAPE '\')
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' ESCAPE '\')
              AND ($4::text IS NULL OR gender = $4)
              AND ($5::bigint IS NULL OR department_id = $5)
            ORDER BY id
            OFFSET $6
            LIMIT $7
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(owner.get())
            .bind(filter.identity_number_prefix.as_deref().map(like_literal))
            .bind(filter.name.as_deref().map(like_literal))
            .bind(filter.gender.value().map(|g| g.as_str()))
            .bind(filter.department_id.value().map(|d| d.get()))
            .bind(page.offset)
            .bind(page.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_employees", e))?;

        rows.iter().map(employee_from_row).collect()
    }

    async fn exists_referencing(&self, _owner: UserId, _key: &IdentityNumber) -> StoreResult<bool> {
        Ok(false)
    }
}
