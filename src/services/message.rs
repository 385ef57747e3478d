//! Message service: validated CRUD over the message store.
//!
//! DESIGN
//! ======
//! Text must be 1..=255 characters on both create and update. Authorship is
//! checked once, at create time; updates and deletes never re-validate
//! `posted_by`.
//!
//! TRADE-OFFS
//! ==========
//! `update_text` is a read, a write, and a read-back with no transaction.
//! A concurrent delete between steps shows up as `NotFound` rather than a
//! distinct race error.

use std::sync::Arc;

use tracing::{debug, info};

use super::{AccountLookup, AuthoredMessages, ServiceError};
use crate::db::MessageStore;
use crate::models::{Message, NewMessage};

/// Counted in Unicode scalar values (`chars()`), not UTF-16 code units, so
/// text with astral-plane characters such as emoji may hold more symbols
/// than a UTF-16 counter would allow.
pub const MAX_MESSAGE_LEN: usize = 255;

fn validate_text(text: &str) -> Result<(), ServiceError> {
    let len = text.chars().count();
    if len == 0 {
        return Err(ServiceError::Invalid("message text must not be empty".into()));
    }
    if len > MAX_MESSAGE_LEN {
        return Err(ServiceError::Invalid(format!(
            "message text exceeds {MAX_MESSAGE_LEN} characters ({len})"
        )));
    }
    Ok(())
}

pub struct MessageService {
    store: Arc<dyn MessageStore>,
    accounts: Arc<dyn AccountLookup>,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>, accounts: Arc<dyn AccountLookup>) -> Self {
        Self { store, accounts }
    }

    /// All messages, in store order.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Message>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn get_by_id(&self, message_id: i32) -> Result<Option<Message>, ServiceError> {
        Ok(self.store.find_by_id(message_id).await?)
    }

    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn list_by_author(&self, account_id: i32) -> Result<Vec<Message>, ServiceError> {
        Ok(self.store.find_by_author(account_id).await?)
    }

    /// Post a new message.
    ///
    /// # Errors
    ///
    /// `Invalid` for bad text or an unknown `posted_by`, `Unavailable` if
    /// the store fails.
    pub async fn create(&self, candidate: NewMessage) -> Result<Message, ServiceError> {
        if let Err(e) = validate_text(&candidate.message_text) {
            debug!(posted_by = candidate.posted_by, error = %e, "message rejected");
            return Err(e);
        }
        if !self.accounts.account_exists(candidate.posted_by).await? {
            debug!(posted_by = candidate.posted_by, "message rejected: unknown author");
            return Err(ServiceError::Invalid(format!("no account with id {}", candidate.posted_by)));
        }

        let message = self.store.insert(&candidate).await?;
        info!(message_id = message.message_id, posted_by = message.posted_by, "message posted");
        Ok(message)
    }

    /// Replace a message's text and return the re-read record.
    ///
    /// # Errors
    ///
    /// `Invalid` for bad text, `NotFound` if the id does not exist (or
    /// disappears mid-update), `Unavailable` if the store fails.
    pub async fn update_text(&self, message_id: i32, text: &str) -> Result<Message, ServiceError> {
        if let Err(e) = validate_text(text) {
            debug!(message_id, error = %e, "update rejected");
            return Err(e);
        }
        if self.get_by_id(message_id).await?.is_none() {
            debug!(message_id, "update rejected: no such message");
            return Err(ServiceError::NotFound);
        }
        if !self.store.update_text(message_id, text).await? {
            return Err(ServiceError::NotFound);
        }

        let updated = self.get_by_id(message_id).await?.ok_or(ServiceError::NotFound)?;
        info!(message_id, "message text updated");
        Ok(updated)
    }

    /// Delete a message, returning it as it was. `None` if it did not exist.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the store fails.
    pub async fn delete_by_id(&self, message_id: i32) -> Result<Option<Message>, ServiceError> {
        let deleted = self.store.delete(message_id).await?;
        if deleted.is_some() {
            info!(message_id, "message deleted");
        }
        Ok(deleted)
    }
}

#[async_trait::async_trait]
impl AuthoredMessages for MessageService {
    async fn messages_by_author(&self, account_id: i32) -> Result<Vec<Message>, ServiceError> {
        self.list_by_author(account_id).await
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
