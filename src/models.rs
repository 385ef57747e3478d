//! Record shapes shared by the stores, services, and HTTP layer.
//!
//! DESIGN
//! ======
//! `Account` and `Message` mirror the `account` and `message` tables column
//! for column, so the serde field names double as the wire format. The
//! `New*` variants are the id-less candidates accepted on insert; any id a
//! client sends is ignored because ids are generated by the database.

use serde::{Deserialize, Serialize};

// =============================================================================
// ACCOUNT
// =============================================================================

/// A registered account. Mirrors the `account` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i32,
    pub username: String,
    pub password: String,
}

/// Registration or login payload. Any `account_id` in the body is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl NewAccount {
    /// Attach a store-generated id.
    #[must_use]
    pub fn with_id(self, account_id: i32) -> Account {
        Account { account_id, username: self.username, password: self.password }
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// A posted message. Mirrors the `message` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i32,
    pub posted_by: i32,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

/// Message candidate for insert. `time_posted_epoch` is caller-supplied,
/// unvalidated, and 0 when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMessage {
    pub posted_by: i32,
    pub message_text: String,
    #[serde(default)]
    pub time_posted_epoch: i64,
}

impl NewMessage {
    /// Attach a store-generated id.
    #[must_use]
    pub fn with_id(self, message_id: i32) -> Message {
        Message {
            message_id,
            posted_by: self.posted_by,
            message_text: self.message_text,
            time_posted_epoch: self.time_posted_epoch,
        }
    }
}

#[cfg(test)]
impl NewAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

#[cfg(test)]
impl NewMessage {
    pub fn new(posted_by: i32, message_text: impl Into<String>, time_posted_epoch: i64) -> Self {
        Self { posted_by, message_text: message_text.into(), time_posted_epoch }
    }
}
