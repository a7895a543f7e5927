//! Account storage for the cafe storefront.
//!
//! Accounts are kept behind the [`AccountStore`] port so the sign-up
//! service does not care whether they live in memory or in a JSON
//! document on disk. Both backends enforce case-insensitive email
//! uniqueness inside `insert`.

mod error;
mod file;
mod index;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use file::FileAccountStore;
pub use memory::MemoryAccountStore;
pub use store::AccountStore;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewAccount {
        NewAccount {
            email: "jane@cafe.test".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            name: "Jane Doe".into(),
            role: Role::General,
            profile_pic: None,
        }
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::General).unwrap(), "\"GENERAL\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");

        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_role_default_and_display() {
        assert_eq!(Role::default(), Role::General);
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }

    #[test]
    fn test_account_from_draft_assigns_identity() {
        let a = Account::from_draft(draft());
        let b = Account::from_draft(draft());

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(a.email, "jane@cafe.test");
    }

    #[test]
    fn test_view_strips_password_hash() {
        let account = Account::from_draft(draft());
        let json = serde_json::to_value(account.view()).unwrap();

        assert_eq!(json["email"], "jane@cafe.test");
        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["role"], "GENERAL");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert!(json.get("profilePic").is_none());
    }

    #[test]
    fn test_view_includes_profile_pic_when_present() {
        let mut d = draft();
        d.profile_pic = Some("data:image/png;base64,AAAA".into());
        let json = serde_json::to_value(Account::from_draft(d).view()).unwrap();

        assert_eq!(json["profilePic"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_account_deserialization_defaults_role() {
        let json = r#"{
            "id": "7f1c1d3e-2a8b-4b64-9a57-0d4c8e1f2a3b",
            "email": "old@cafe.test",
            "password_hash": "$2b$12$x",
            "name": "Old Account",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.role, Role::General);
        assert!(account.profile_pic.is_none());
    }
}
