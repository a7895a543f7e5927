//! Account registration pipeline.

use crate::config::SecurityConfig;
use crate::credentials::{hash_password, ElevationSecret};
use crate::error::RegistrationError;
use account_store::{AccountStore, AccountView, NewAccount, Role};
use secrecy::SecretString;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::ValidateEmail;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Sign-up request as submitted by the storefront.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error rather than a parse failure. Unknown fields (the
/// form's `confirmPassword`, for instance) are ignored.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,

    /// Elevation secret; grants ADMIN when it matches the server's key
    pub admin_key: Option<String>,

    /// Profile picture, usually a base64 data URL
    pub profile_pic: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .field("admin_key", &self.admin_key.as_ref().map(|_| "[REDACTED]"))
            .field("profile_pic_len", &self.profile_pic.as_ref().map(String::len))
            .finish()
    }
}

/// Result of a successful sign-up.
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: AccountView,
    pub message: String,
}

/// Fields that passed validation.
struct ValidatedSignup<'a> {
    email: String,
    password: &'a str,
    name: &'a str,
}

/// Validates, hashes and stores new accounts.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn AccountStore>,
    elevation_secret: Option<ElevationSecret>,
    security: SecurityConfig,
}

impl RegistrationService {
    /// Create a service. `elevation_secret` of `None` disables admin sign-up.
    pub fn new(
        store: Arc<dyn AccountStore>,
        elevation_secret: Option<SecretString>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            elevation_secret: elevation_secret.map(ElevationSecret::new),
            security,
        }
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.store.count().await
    }

    /// Register a new account.
    ///
    /// Checks run in a fixed order and the first failure wins. Nothing is
    /// written unless every check passes.
    #[instrument(skip(self, request))]
    pub async fn register(
        &self,
        mut request: RegisterRequest,
    ) -> Result<Registration, RegistrationError> {
        let profile_pic = request.profile_pic.take().filter(|pic| !pic.is_empty());
        let signup = self.validate(&request)?;

        if self.store.find_by_email(&signup.email).await?.is_some() {
            warn!(email = %signup.email, "Sign-up for existing account rejected");
            return Err(RegistrationError::AlreadyExists);
        }

        let role = self.resolve_role(request.admin_key.as_deref())?;

        let password_hash = hash_password(signup.password, self.security.bcrypt_cost).await?;

        let draft = NewAccount {
            email: signup.email,
            password_hash,
            name: signup.name.to_string(),
            role,
            profile_pic,
        };

        let account = self.store.insert(draft).await?;

        info!(email = %account.email, id = %account.id, role = %role, "Account created");

        Ok(Registration {
            account: account.view(),
            message: format!("{} User created Successfully!", role),
        })
    }

    fn validate<'a>(
        &self,
        request: &'a RegisterRequest,
    ) -> Result<ValidatedSignup<'a>, RegistrationError> {
        let email = request
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(RegistrationError::MissingEmail)?
            .to_lowercase();

        if !email.validate_email() {
            return Err(RegistrationError::InvalidEmail);
        }

        let password = request
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(RegistrationError::MissingPassword)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::WeakPassword(MIN_PASSWORD_LENGTH));
        }
        // Upper bound is in bytes: that is what bcrypt reads.
        if password.len() > self.security.max_password_length {
            return Err(RegistrationError::PasswordTooLong(
                self.security.max_password_length,
            ));
        }

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(RegistrationError::MissingName)?;

        Ok(ValidatedSignup {
            email,
            password,
            name,
        })
    }

    fn resolve_role(&self, admin_key: Option<&str>) -> Result<Role, RegistrationError> {
        let Some(key) = admin_key.filter(|k| !k.is_empty()) else {
            return Ok(Role::General);
        };

        let secret = self
            .elevation_secret
            .as_ref()
            .ok_or(RegistrationError::ElevationNotConfigured)?;

        if !secret.matches(key) {
            warn!("Admin sign-up with invalid registration key");
            return Err(RegistrationError::ElevationSecretMismatch);
        }

        Ok(Role::Admin)
    }
}
