//! Password hashing and elevation-secret checks.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Lowest bcrypt cost the library accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest bcrypt cost the library accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt only reads this many bytes of input; the rest is ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Credential handling failures. Always internal: never caused by the client.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("password is {0} bytes, bcrypt accepts at most 72")]
    PasswordTooLong(usize),
}

fn check_length(password: &str) -> Result<(), CredentialError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong(password.len()));
    }
    Ok(())
}

/// Hash a password with bcrypt and a fresh random salt.
///
/// bcrypt is CPU-bound, so the work runs on the blocking thread pool.
/// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
/// truncated.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    check_length(password)?;
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Check a password against a stored bcrypt hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, CredentialError> {
    check_length(password)?;
    let password = password.to_owned();
    let hash = hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(valid)
}

/// Server-held secret that grants the ADMIN role at sign-up.
#[derive(Clone)]
pub struct ElevationSecret {
    secret: SecretString,
}

impl ElevationSecret {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Compare a candidate against the secret in constant time.
    ///
    /// Both sides are reduced to SHA-256 digests first so the comparison
    /// also hides the secret's length.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = Sha256::digest(self.secret.expose_secret().as_bytes());
        let provided = Sha256::digest(candidate.as_bytes());
        expected.as_slice().ct_eq(provided.as_slice()).into()
    }
}

impl std::fmt::Debug for ElevationSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ElevationSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_is_salted_and_verifies() {
        let first = hash_password("Str0ngPass!", MIN_BCRYPT_COST).await.unwrap();
        let second = hash_password("Str0ngPass!", MIN_BCRYPT_COST).await.unwrap();

        assert_ne!(first, second);
        assert_ne!(first, "Str0ngPass!");
        assert!(verify_password("Str0ngPass!", &first).await.unwrap());
        assert!(verify_password("Str0ngPass!", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_does_not_verify() {
        let hash = hash_password("Str0ngPass!", MIN_BCRYPT_COST).await.unwrap();
        assert!(!verify_password("str0ngpass!", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_embeds_cost() {
        let hash = hash_password("Str0ngPass!", 5).await.unwrap();
        assert!(hash.starts_with("$2b$05$"));
    }

    #[tokio::test]
    async fn test_invalid_cost_is_error() {
        let result = hash_password("Str0ngPass!", 2).await;
        assert!(matches!(result, Err(CredentialError::Bcrypt(_))));
    }

    #[tokio::test]
    async fn test_verify_malformed_hash_is_error() {
        let result = verify_password("Str0ngPass!", "not-a-bcrypt-hash").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_long_password_is_not_truncated() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let long = format!("{prefix}SECRET-TAIL");

        let result = hash_password(&long, MIN_BCRYPT_COST).await;
        assert!(matches!(result, Err(CredentialError::PasswordTooLong(83))));

        let hash = hash_password(&prefix, MIN_BCRYPT_COST).await.unwrap();
        assert!(verify_password(&prefix, &hash).await.unwrap());
        assert!(matches!(
            verify_password(&long, &hash).await,
            Err(CredentialError::PasswordTooLong(_))
        ));
    }

    #[tokio::test]
    async fn test_password_limit_counts_bytes() {
        // 36 two-byte characters fill the limit exactly, one more exceeds it.
        assert!(hash_password(&"é".repeat(36), MIN_BCRYPT_COST).await.is_ok());
        assert!(matches!(
            hash_password(&"é".repeat(37), MIN_BCRYPT_COST).await,
            Err(CredentialError::PasswordTooLong(74))
        ));
    }

    #[test]
    fn test_elevation_secret_matches() {
        let secret = ElevationSecret::new(SecretString::new("S3cret".into()));

        assert!(secret.matches("S3cret"));
        assert!(!secret.matches("wrong"));
        assert!(!secret.matches("s3cret"));
        assert!(!secret.matches("S3cret "));
        assert!(!secret.matches(""));
    }

    #[test]
    fn test_elevation_secret_debug_is_redacted() {
        let secret = ElevationSecret::new(SecretString::new("S3cret".into()));
        assert!(!format!("{:?}", secret).contains("S3cret"));
    }
}
