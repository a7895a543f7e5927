//! HTTP request handlers.

use super::types::{HealthResponse, SignupResponse};
use super::AppState;
use crate::error::RegistrationError;
use crate::registration::RegisterRequest;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        account_count: state.service.account_count().await,
    })
}

/// Register a new account.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), RegistrationError> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!("Rejected oversized sign-up body");
            return RegistrationError::PayloadTooLarge;
        }
        warn!(reason = %rejection.body_text(), "Rejected malformed sign-up body");
        RegistrationError::MalformedBody
    })?;

    let registration = state.service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            data: registration.account,
            success: true,
            error: false,
            message: registration.message,
        }),
    ))
}
