//! API response types.

use account_store::AccountView;
use serde::Serialize;

/// Successful sign-up response.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub data: AccountView,
    pub success: bool,
    pub error: bool,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub account_count: usize,
}
