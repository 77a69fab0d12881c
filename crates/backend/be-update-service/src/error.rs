use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use omaha_protocol::ProtocolError;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failures of the decision engine itself
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Request contains no app entries")]
    EmptyRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateServiceError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UpdateServiceError {
    /// Short machine-readable label, also used for analytics
    pub fn kind(&self) -> &'static str {
        match self {
            UpdateServiceError::Protocol(ProtocolError::MalformedDocument(_)) => {
                "malformed_document"
            }
            UpdateServiceError::Protocol(ProtocolError::Encode(_)) => "encode_failed",
            UpdateServiceError::Decision(DecisionError::EmptyRequest) => "empty_request",
            UpdateServiceError::Config(_) => "config",
        }
    }
}

impl IntoResponse for UpdateServiceError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            UpdateServiceError::Protocol(ProtocolError::MalformedDocument(reason)) => {
                warn!("Rejected malformed request document: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    "Malformed request document",
                    Some(reason.clone()),
                )
            }
            UpdateServiceError::Protocol(ProtocolError::Encode(e)) => {
                error!("Failed to encode response document: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to encode response",
                    None,
                )
            }
            UpdateServiceError::Decision(DecisionError::EmptyRequest) => {
                warn!("Rejected request without app entries");
                (
                    StatusCode::BAD_REQUEST,
                    "Request contains no app entries",
                    Some("At least one <app> element is required".to_owned()),
                )
            }
            UpdateServiceError::Config(e) => {
                error!("Update service misconfigured: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Update service misconfigured",
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.kind().to_owned(),
                message: message.to_owned(),
                details,
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, UpdateServiceError>;
