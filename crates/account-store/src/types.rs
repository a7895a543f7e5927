//! Account data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account role.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular storefront customer
    #[default]
    General,
    /// Storefront administrator (product management)
    Admin,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::General => "GENERAL",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account.
///
/// Holds the password hash, so it must never be serialized into an API
/// response. Use [`AccountView`] for that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Identifier assigned by the store
    pub id: Uuid,

    /// Case-folded email address
    pub email: String,

    /// bcrypt hash of the password (salt embedded)
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Profile picture, usually a data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a stored account from a draft, assigning identity and timestamps.
    pub fn from_draft(draft: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: draft.email,
            password_hash: draft.password_hash,
            name: draft.name,
            role: draft.role,
            profile_pic: draft.profile_pic,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public view of this account (no credential material).
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            profile_pic: self.profile_pic.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Insert draft. The store fills in `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub profile_pic: Option<String>,
}

/// Account as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
