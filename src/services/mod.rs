//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and orchestration so route handlers can
//! stay focused on protocol translation. Services talk to the database only
//! through the store traits in `crate::db`.
//!
//! The account and message services each need one read from the other.
//! Instead of depending on each other directly they depend on the two small
//! capability traits below: [`AccountLookup`] (implemented by
//! `AccountService`) and [`AuthoredMessages`] (implemented by every
//! `MessageStore` and by `MessageService`). Construction order is then
//! stores, `AccountService`, `MessageService`.

pub mod account;
pub mod message;

use crate::db::{MessageStore, StoreError};
use crate::models::Message;

pub use account::AccountService;
pub use message::MessageService;

// =============================================================================
// ERRORS
// =============================================================================

/// Why a service operation produced no result.
///
/// The HTTP layer collapses every variant into the same failure status; the
/// variants exist so the cause can be logged and tested.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict("unique constraint violated".into()),
            StoreError::Database(_) => Self::Unavailable(err),
        }
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Answers whether an account id refers to a registered account.
#[async_trait::async_trait]
pub trait AccountLookup: Send + Sync {
    async fn account_exists(&self, account_id: i32) -> Result<bool, ServiceError>;
}

/// Lists the messages posted by one account.
#[async_trait::async_trait]
pub trait AuthoredMessages: Send + Sync {
    async fn messages_by_author(&self, account_id: i32) -> Result<Vec<Message>, ServiceError>;
}

#[async_trait::async_trait]
impl<S: MessageStore + ?Sized> AuthoredMessages for S {
    async fn messages_by_author(&self, account_id: i32) -> Result<Vec<Message>, ServiceError> {
        Ok(self.find_by_author(account_id).await?)
    }
}
