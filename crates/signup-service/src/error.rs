//! Error types for the sign-up service.

use crate::credentials::CredentialError;
use account_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Message shown to clients for any unexpected failure.
const INTERNAL_MESSAGE: &str = "Signup failed";

/// Registration errors.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Please provide email")]
    MissingEmail,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Please provide password")]
    MissingPassword,

    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("Password must be at most {0} bytes long")]
    PasswordTooLong(usize),

    #[error("Please provide name")]
    MissingName,

    #[error("Invalid request body")]
    MalformedBody,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Invalid admin registration key")]
    ElevationSecretMismatch,

    #[error("Admin registration is not configured")]
    ElevationNotConfigured,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Unexpected failure. The detail is logged, never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RegistrationError::MissingEmail
            | RegistrationError::InvalidEmail
            | RegistrationError::MissingPassword
            | RegistrationError::WeakPassword(_)
            | RegistrationError::PasswordTooLong(_)
            | RegistrationError::MissingName
            | RegistrationError::MalformedBody => StatusCode::BAD_REQUEST,
            RegistrationError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RegistrationError::AlreadyExists => StatusCode::CONFLICT,
            RegistrationError::ElevationSecretMismatch => StatusCode::FORBIDDEN,
            RegistrationError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            RegistrationError::ElevationNotConfigured | RegistrationError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-visible message.
    pub fn client_message(&self) -> String {
        match self {
            RegistrationError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: bool,
    pub success: bool,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match &self {
            RegistrationError::Internal(detail) => {
                error!(error = %detail, "Signup failed with internal error");
            }
            RegistrationError::ElevationNotConfigured => {
                error!("Admin sign-up requested but ADMIN_REGISTRATION_KEY is not configured");
            }
            _ => {}
        }

        let body = ErrorResponse {
            message: self.client_message(),
            error: true,
            success: false,
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        match e {
            // Lost the race against a concurrent sign-up: same outcome as the pre-check.
            StoreError::Duplicate(_) => RegistrationError::AlreadyExists,
            other => RegistrationError::Internal(other.to_string()),
        }
    }
}

impl From<CredentialError> for RegistrationError {
    fn from(e: CredentialError) -> Self {
        RegistrationError::Internal(e.to_string())
    }
}
