//! Persistence port for accounts.

use crate::error::StoreError;
use crate::types::{Account, NewAccount};
use async_trait::async_trait;

/// Account persistence.
///
/// `insert` is the authoritative uniqueness check: implementations must
/// return [`StoreError::Duplicate`] when the case-folded email is already
/// present, even if an earlier `find_by_email` said otherwise.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account, assigning its id and timestamps.
    async fn insert(&self, draft: NewAccount) -> Result<Account, StoreError>;

    /// Number of stored accounts.
    async fn count(&self) -> usize;
}
