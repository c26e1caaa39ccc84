//! PostgreSQL-backed account directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use fleetdesk_core::error::{AppError, ErrorKind};
use fleetdesk_core::result::AppResult;
use fleetdesk_core::traits::directory::AccountDirectory;
use fleetdesk_entity::account::{Account, SessionPointer};
use fleetdesk_entity::role::Role;

/// `AccountDirectory` implementation over the accounts, roles,
/// account_roles, and role_permissions tables.
#[derive(Debug, Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    /// Create a new directory over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PgAccountDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by username", e)
        })
    }

    async fn find_by_id(&self, account_id: i64) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn roles_for_account(&self, account_id: i64) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN account_roles ar ON ar.role_id = r.id \
             WHERE ar.account_id = $1 \
             ORDER BY r.id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load roles for account", e)
        })
    }

    async fn permission_codes_for_roles(&self, role_ids: &[i64]) -> AppResult<Vec<String>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT permission_code FROM role_permissions \
             WHERE role_id = ANY($1)",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load permission codes", e)
        })
    }

    async fn session_pointer(&self, account_id: i64) -> AppResult<Option<SessionPointer>> {
        let row: Option<(Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT session_origin, session_token FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read session pointer", e)
        })?;

        // Both columns are written together; anything else reads as no session.
        Ok(match row {
            Some((Some(origin), Some(token))) => Some(SessionPointer { origin, token }),
            _ => None,
        })
    }

    async fn persist_session_pointer(
        &self,
        account_id: i64,
        origin: &str,
        token: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET session_origin = $2, session_token = $3 WHERE id = $1",
        )
        .bind(account_id)
        .bind(origin)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to persist session pointer", e)
        })?;
        Ok(())
    }

    async fn clear_session_pointer(&self, account_id: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET session_origin = NULL, session_token = NULL WHERE id = $1",
        )
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear session pointer", e)
        })?;
        Ok(())
    }

    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET last_login_at = $2 WHERE id = $1")
            .bind(account_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to record last login", e)
            })?;
        Ok(())
    }
}
