//! Account store: lookups and inserts over the `account` table.

use sqlx::PgPool;

use super::{StoreError, store_failure};
use crate::credentials::{encode_password, password_matches};
use crate::models::{Account, NewAccount};

type AccountRow = (i32, String, String);

fn to_account((account_id, username, password): AccountRow) -> Account {
    Account { account_id, username, password }
}

/// Persistence operations for accounts. Each call is a single statement.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account and return it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the username is already taken.
    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError>;

    /// Look up an account by username and check the password.
    async fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<Account>, StoreError> {
        let account = self.find_by_username(username).await?;
        Ok(account.filter(|a| password_matches(&a.password, password)))
    }
}

/// Postgres-backed [`AccountStore`].
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, username, password FROM account WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("account.find_by_id", e))?;

        Ok(row.map(to_account))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, username, password FROM account WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("account.find_by_username", e))?;

        Ok(row.map(to_account))
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let stored = NewAccount {
            username: account.username.clone(),
            password: encode_password(&account.password),
        };
        let account_id: i32 = sqlx::query_scalar(
            "INSERT INTO account (username, password) VALUES ($1, $2) RETURNING account_id",
        )
        .bind(&stored.username)
        .bind(&stored.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_failure("account.insert", e))?;

        Ok(stored.with_id(account_id))
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "account_test.rs"]
mod tests;
