use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use workforce_core::UserId;
use workforce_directory::{StoreError, StoreResult, User, UserStore};

use super::{PostgresDirectory, decode_error, map_sqlx_error, with_cause};

const COLUMNS: &str = "id, email, password, name, user_image_uri, company_name, company_image_uri";
const EMAIL_TAKEN: &str = "email is exist";

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let decode = |e| decode_error("user row", e);
    Ok(User {
        id: UserId::new(row.try_get("id").map_err(decode)?),
        email: row.try_get("email").map_err(decode)?,
        password_digest: row.try_get("password").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        image_uri: row.try_get("user_image_uri").map_err(decode)?,
        company_name: row.try_get("company_name").map_err(decode)?,
        company_image_uri: row.try_get("company_image_uri").map_err(decode)?,
    })
}

fn email_error(operation: &str, err: sqlx::Error) -> StoreError {
    match map_sqlx_error(operation, err) {
        conflict @ StoreError::Conflict(_) => with_cause(conflict, EMAIL_TAKEN),
        other => other,
    }
}

#[async_trait]
impl UserStore for PostgresDirectory {
    #[instrument(skip(self, password_digest), err)]
    async fn create(&self, email: &str, password_digest: &str) -> StoreResult<User> {
        let sql = format!("INSERT INTO users (email, password) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(email)
            .bind(password_digest)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| email_error("insert_user", e))?;

        user_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_id", e))?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?
            .as_ref()
            .map(user_from_row)
            .transpose()
    }

    #[instrument(skip(self), err)]
    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("email_exists", e))
    }

    #[instrument(skip(self), err)]
    async fn update(&self, merged: User) -> StoreResult<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET email = $1,
                name = $2,
                user_image_uri = $3,
                company_name = $4,
                company_image_uri = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&merged.email)
            .bind(merged.name.as_deref())
            .bind(merged.image_uri.as_deref())
            .bind(merged.company_name.as_deref())
            .bind(merged.company_image_uri.as_deref())
            .bind(merged.id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| email_error("update_user", e))?
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))?;

        user_from_row(&row)
    }
}
