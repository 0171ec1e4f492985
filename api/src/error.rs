//! Unified error types for the image search API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and persistence errors
//! - `ProviderError`: Tagging provider (Imagga) client errors
//! - `AppError`: Application layer errors (wraps the others for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::ImageId;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Tagging provider client errors
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider rejected credentials")]
    Auth,

    #[error("Provider rejected request: {status} - {message}")]
    BadRequest { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    Protocol(String),
}

impl ProviderError {
    /// Map a non-2xx provider status onto the error taxonomy
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Auth,
            429 | 500..=599 => {
                ProviderError::Unavailable(format!("status {}: {}", status, message))
            }
            _ => ProviderError::BadRequest { status, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Protocol(e.to_string())
        } else {
            ProviderError::Unavailable(e.to_string())
        }
    }
}

/// Application layer errors - used by the intake service and HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Content rejected by moderation: image {0}")]
    ContentRejected(ImageId),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg))
            | AppError::Domain(DomainError::InvalidSubmission(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::InvalidTransition(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Provider(e) => {
                tracing::error!("Provider error: {}", e);
                match e {
                    ProviderError::Unavailable(_) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Tagging provider unavailable",
                        None,
                    ),
                    ProviderError::BadRequest { message, .. } => (
                        StatusCode::BAD_GATEWAY,
                        "Tagging provider rejected the image",
                        Some(message.clone()),
                    ),
                    ProviderError::Auth | ProviderError::Protocol(_) => {
                        (StatusCode::BAD_GATEWAY, "Tagging provider error", None)
                    }
                }
            }
            AppError::ContentRejected(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Content rejected",
                Some(format!(
                    "Image {} did not pass content moderation and was blacklisted",
                    id
                )),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
