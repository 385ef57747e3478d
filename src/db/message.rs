//! Message store: CRUD over the `message` table.
//!
//! DESIGN
//! ======
//! Listing applies no `ORDER BY`; callers get rows in whatever order
//! Postgres returns them. `delete` reads the row first so it can hand back
//! the pre-delete snapshot, then deletes by id. The two statements are not
//! wrapped in a transaction.

use sqlx::PgPool;

use super::{StoreError, store_failure};
use crate::models::{Message, NewMessage};

type MessageRow = (i32, i32, String, i64);

const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";

fn to_message((message_id, posted_by, message_text, time_posted_epoch): MessageRow) -> Message {
    Message { message_id, posted_by, message_text, time_posted_epoch }
}

/// Persistence operations for messages.
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Message>, StoreError>;

    async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, StoreError>;

    async fn find_by_author(&self, account_id: i32) -> Result<Vec<Message>, StoreError>;

    /// Insert a new message and return it with its generated id.
    async fn insert(&self, message: &NewMessage) -> Result<Message, StoreError>;

    /// Replace `message_text`. Returns `true` iff exactly one row changed.
    async fn update_text(&self, message_id: i32, text: &str) -> Result<bool, StoreError>;

    /// Delete a message, returning the row as it was before deletion.
    /// `None` if no row had this id.
    async fn delete(&self, message_id: i32) -> Result<Option<Message>, StoreError>;
}

/// Postgres-backed [`MessageStore`].
#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for PgMessageStore {
    async fn find_all(&self) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!("SELECT {MESSAGE_COLUMNS} FROM message"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_failure("message.find_all", e))?;

        Ok(rows.into_iter().map(to_message).collect())
    }

    async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM message WHERE message_id = $1"
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_failure("message.find_by_id", e))?;

        Ok(row.map(to_message))
    }

    async fn find_by_author(&self, account_id: i32) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM message WHERE posted_by = $1"
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_failure("message.find_by_author", e))?;

        Ok(rows.into_iter().map(to_message).collect())
    }

    async fn insert(&self, message: &NewMessage) -> Result<Message, StoreError> {
        let message_id: i32 = sqlx::query_scalar(
            "INSERT INTO message (posted_by, message_text, time_posted_epoch) VALUES ($1, $2, $3)
             RETURNING message_id",
        )
        .bind(message.posted_by)
        .bind(&message.message_text)
        .bind(message.time_posted_epoch)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_failure("message.insert", e))?;

        Ok(message.clone().with_id(message_id))
    }

    async fn update_text(&self, message_id: i32, text: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE message SET message_text = $1 WHERE message_id = $2")
            .bind(text)
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_failure("message.update_text", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, message_id: i32) -> Result<Option<Message>, StoreError> {
        let Some(snapshot) = self.find_by_id(message_id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM message WHERE message_id = $1")
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_failure("message.delete", e))?;

        // A concurrent delete can win between the read and the write.
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(snapshot))
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "message_test.rs"]
mod tests;
