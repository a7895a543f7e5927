//! In-memory account index shared by the store backends.

use crate::error::StoreError;
use crate::types::{Account, NewAccount};
use std::collections::HashMap;

/// Accounts indexed by case-folded email.
///
/// This is the uniqueness constraint: `insert_unique` refuses a second
/// account for the same email regardless of case.
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    accounts: HashMap<String, Account>,
}

fn key(email: &str) -> String {
    email.to_lowercase()
}

impl AccountIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Rebuild an index from stored accounts.
    ///
    /// Later duplicates are rejected so a hand-edited document cannot
    /// smuggle in two accounts for one email.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, StoreError> {
        let mut index = Self::new();
        for account in accounts {
            let k = key(&account.email);
            if index.accounts.contains_key(&k) {
                return Err(StoreError::Duplicate(account.email));
            }
            index.accounts.insert(k, account);
        }
        Ok(index)
    }

    /// Get an account by email (any case).
    pub fn get(&self, email: &str) -> Option<&Account> {
        self.accounts.get(&key(email))
    }

    /// Insert a new account unless the email is taken.
    pub fn insert_unique(&mut self, draft: NewAccount) -> Result<Account, StoreError> {
        let k = key(&draft.email);
        if self.accounts.contains_key(&k) {
            return Err(StoreError::Duplicate(draft.email));
        }

        let account = Account::from_draft(draft);
        self.accounts.insert(k, account.clone());
        Ok(account)
    }

    /// Remove an account by email.
    pub fn remove(&mut self, email: &str) -> Option<Account> {
        self.accounts.remove(&key(email))
    }

    /// List all accounts, oldest first.
    pub fn list_all(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|a| a.created_at);
        accounts
    }

    /// Number of accounts.
    pub fn count(&self) -> usize {
        self.accounts.len()
    }
}
