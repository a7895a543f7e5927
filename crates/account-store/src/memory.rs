//! In-memory account store.

use crate::error::StoreError;
use crate::index::AccountIndex;
use crate::store::AccountStore;
use crate::types::{Account, NewAccount};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Account store without persistence. Data is lost on restart.
#[derive(Default)]
pub struct MemoryAccountStore {
    index: RwLock<AccountIndex>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            index: RwLock::new(AccountIndex::new()),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let index = self.index.read().await;
        Ok(index.get(email).cloned())
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    async fn insert(&self, draft: NewAccount) -> Result<Account, StoreError> {
        let mut index = self.index.write().await;
        let account = index.insert_unique(draft)?;
        debug!(total = index.count(), "Account inserted in memory store");
        Ok(account)
    }

    async fn count(&self) -> usize {
        self.index.read().await.count()
    }
}
