//! Account service: registration, login, and existence checks.
//!
//! DESIGN
//! ======
//! Registration checks run in a fixed order: password length, then empty
//! username, then username uniqueness. The first failing check wins. The
//! uniqueness check and the insert are separate statements; the unique
//! index on `account.username` catches the race and surfaces as
//! [`ServiceError::Conflict`] either way.

use std::sync::Arc;

use tracing::{debug, info};

use super::{AccountLookup, AuthoredMessages, ServiceError};
use crate::db::AccountStore;
use crate::models::{Account, Message, NewAccount};

/// Counted in Unicode scalar values, like [`super::message::MAX_MESSAGE_LEN`].
/// A single astral-plane character counts once here but twice in UTF-16.
pub const MIN_PASSWORD_LEN: usize = 4;

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    messages: Arc<dyn AuthoredMessages>,
}

impl AccountService {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, messages: Arc<dyn AuthoredMessages>) -> Self {
        Self { store, messages }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// `Invalid` for a short password or empty username, `Conflict` if the
    /// username is taken, `Unavailable` if the store fails.
    pub async fn register(&self, candidate: NewAccount) -> Result<Account, ServiceError> {
        if candidate.password.chars().count() < MIN_PASSWORD_LEN {
            debug!(username = %candidate.username, "registration rejected: password too short");
            return Err(ServiceError::Invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if candidate.username.is_empty() {
            debug!("registration rejected: empty username");
            return Err(ServiceError::Invalid("username must not be empty".into()));
        }
        if self.store.find_by_username(&candidate.username).await?.is_some() {
            debug!(username = %candidate.username, "registration rejected: username taken");
            return Err(ServiceError::Conflict(format!("username already taken: {}", candidate.username)));
        }

        let account = self.store.insert(&candidate).await?;
        info!(account_id = account.account_id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Verify a username/password pair.
    ///
    /// # Errors
    ///
    /// `NotFound` if no account matches both fields.
    pub async fn login(&self, credentials: &NewAccount) -> Result<Account, ServiceError> {
        self.store
            .find_by_credentials(&credentials.username, &credentials.password)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Whether an account with this id exists.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn exists(&self, account_id: i32) -> Result<bool, ServiceError> {
        Ok(self.store.find_by_id(account_id).await?.is_some())
    }

    /// Every message posted by `account_id`. Empty if there are none.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn messages_by_account(&self, account_id: i32) -> Result<Vec<Message>, ServiceError> {
        self.messages.messages_by_author(account_id).await
    }
}

#[async_trait::async_trait]
impl AccountLookup for AccountService {
    async fn account_exists(&self, account_id: i32) -> Result<bool, ServiceError> {
        self.exists(account_id).await
    }
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
