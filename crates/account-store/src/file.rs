//! JSON document store for accounts.

use crate::error::StoreError;
use crate::index::AccountIndex;
use crate::store::AccountStore;
use crate::types::{Account, NewAccount};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Document schema version.
const DOCUMENT_VERSION: u32 = 1;

/// On-disk layout.
#[derive(Deserialize)]
struct AccountDocument {
    version: u32,
    accounts: Vec<Account>,
}

#[derive(Serialize)]
struct AccountDocumentRef<'a> {
    version: u32,
    accounts: Vec<&'a Account>,
}

/// Account store backed by a single JSON document.
///
/// The whole collection lives in memory and is rewritten after every
/// insert. Writes go through a temp file and a rename.
pub struct FileAccountStore {
    index: RwLock<AccountIndex>,
    storage_path: PathBuf,
}

impl FileAccountStore {
    /// Open the store, loading existing accounts if the document exists.
    pub async fn open(storage_path: PathBuf) -> Result<Self, StoreError> {
        let index = Self::load(&storage_path).await?;
        info!(
            "Opened account document {:?} with {} accounts",
            storage_path,
            index.count()
        );

        Ok(Self {
            index: RwLock::new(index),
            storage_path,
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    async fn load(path: &Path) -> Result<AccountIndex, StoreError> {
        if !path.exists() {
            info!("Account document not found at {:?}, starting empty", path);
            return Ok(AccountIndex::new());
        }

        let data = fs::read(path).await?;
        let document: AccountDocument = serde_json::from_slice(&data)?;

        if document.version != DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedVersion(document.version));
        }

        AccountIndex::from_accounts(document.accounts)
    }

    async fn save(&self, index: &AccountIndex) -> Result<(), StoreError> {
        let document = AccountDocumentRef {
            version: DOCUMENT_VERSION,
            accounts: index.list_all(),
        };
        let data = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        if let Err(e) = fs::rename(&temp_path, &self.storage_path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!(error = %cleanup, "Failed to remove {:?}", temp_path);
            }
            return Err(e.into());
        }

        debug!(
            "Saved account document ({} bytes) to {:?}",
            data.len(),
            self.storage_path
        );
        Ok(())
    }
}

#[async_trait]
impl AccountStore for FileAccountStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let index = self.index.read().await;
        Ok(index.get(email).cloned())
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    async fn insert(&self, draft: NewAccount) -> Result<Account, StoreError> {
        let mut index = self.index.write().await;
        let account = index.insert_unique(draft)?;

        // Keep memory and disk in step: a failed write undoes the insert.
        if let Err(e) = self.save(&index).await {
            error!(error = %e, "Failed to persist account document, rolling back insert");
            index.remove(&account.email);
            return Err(e);
        }

        Ok(account)
    }

    async fn count(&self) -> usize {
        self.index.read().await.count()
    }
}
