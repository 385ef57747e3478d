//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the two services; each service owns its store behind a trait
//! object so tests can swap Postgres for in-memory doubles.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{AccountStore, MessageStore, PgAccountStore, PgMessageStore};
use crate::services::{AccountService, AuthoredMessages, MessageService};

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub messages: Arc<MessageService>,
}

impl AppState {
    /// Wire services over arbitrary stores.
    ///
    /// The account service reads authored messages straight from the message
    /// store, which keeps construction free of a service cycle.
    #[must_use]
    pub fn new<A, M>(account_store: Arc<A>, message_store: Arc<M>) -> Self
    where
        A: AccountStore + 'static,
        M: MessageStore + 'static,
    {
        let authored: Arc<dyn AuthoredMessages> = message_store.clone();
        let accounts = Arc::new(AccountService::new(account_store, authored));
        let messages = Arc::new(MessageService::new(message_store, accounts.clone()));
        Self { accounts, messages }
    }

    /// Wire the Postgres stores over a shared pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgAccountStore::new(pool.clone())),
            Arc::new(PgMessageStore::new(pool)),
        )
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::db::StoreError;
    use crate::models::{Account, Message, NewAccount, NewMessage};

    fn injected_failure() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }

    /// In-memory [`AccountStore`] with sequential ids and a unique username rule.
    #[derive(Default)]
    pub struct MemoryAccountStore {
        rows: Mutex<Vec<Account>>,
        fail: AtomicBool,
    }

    impl MemoryAccountStore {
        /// Make every subsequent call fail like a dropped connection.
        pub fn fail_all(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) { Err(injected_failure()) } else { Ok(()) }
        }
    }

    #[async_trait::async_trait]
    impl AccountStore for MemoryAccountStore {
        async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|a| a.account_id == account_id).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|a| a.username == username).cloned())
        }

        async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|a| a.username == account.username) {
                return Err(StoreError::Conflict);
            }
            let next_id = rows.iter().map(|a| a.account_id).max().unwrap_or(0) + 1;
            let created = account.clone().with_id(next_id);
            rows.push(created.clone());
            Ok(created)
        }
    }

    /// In-memory [`MessageStore`]. Ids are never reused after delete.
    #[derive(Default)]
    pub struct MemoryMessageStore {
        rows: Mutex<Vec<Message>>,
        last_id: Mutex<i32>,
        fail: AtomicBool,
    }

    impl MemoryMessageStore {
        pub fn fail_all(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail.load(Ordering::SeqCst) { Err(injected_failure()) } else { Ok(()) }
        }
    }

    #[async_trait::async_trait]
    impl MessageStore for MemoryMessageStore {
        async fn find_all(&self) -> Result<Vec<Message>, StoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|m| m.message_id == message_id).cloned())
        }

        async fn find_by_author(&self, account_id: i32) -> Result<Vec<Message>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().filter(|m| m.posted_by == account_id).cloned().collect())
        }

        async fn insert(&self, message: &NewMessage) -> Result<Message, StoreError> {
            self.check()?;
            let mut last_id = self.last_id.lock().unwrap();
            *last_id += 1;
            let created = message.clone().with_id(*last_id);
            self.rows.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_text(&self, message_id: i32, text: &str) -> Result<bool, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|m| m.message_id == message_id) {
                Some(row) => {
                    row.message_text = text.to_owned();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, message_id: i32) -> Result<Option<Message>, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let idx = rows.iter().position(|m| m.message_id == message_id);
            Ok(idx.map(|i| rows.remove(i)))
        }
    }

    /// Handles to the stores behind a test `AppState`.
    pub struct TestStores {
        pub accounts: Arc<MemoryAccountStore>,
        pub messages: Arc<MemoryMessageStore>,
    }

    /// Create a test `AppState` backed by empty in-memory stores.
    #[must_use]
    pub fn test_app_state() -> (AppState, TestStores) {
        let accounts = Arc::new(MemoryAccountStore::default());
        let messages = Arc::new(MemoryMessageStore::default());
        let state = AppState::new(accounts.clone(), messages.clone());
        (state, TestStores { accounts, messages })
    }

    /// Register an account directly through the service, panicking on failure.
    pub async fn seed_account(state: &AppState, username: &str) -> Account {
        state
            .accounts
            .register(NewAccount::new(username, "password"))
            .await
            .expect("seed account should register")
    }

    /// Post a message directly through the service, panicking on failure.
    pub async fn seed_message(state: &AppState, posted_by: i32, text: &str) -> Message {
        state
            .messages
            .create(NewMessage::new(posted_by, text, 1_669_947_792))
            .await
            .expect("seed message should post")
    }
}
