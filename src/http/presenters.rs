use crate::utils::error::{EntregadorError, ErrorCategory};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub const CREATED_MESSAGE: &str = "Entrega registrada com sucesso";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

impl CreatedResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            message: CREATED_MESSAGE.to_string(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error as returned to HTTP clients.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EntregadorError> for ApiError {
    fn from(error: EntregadorError) -> Self {
        let status = match error.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = EntregadorError::ValidationError {
            message: "apartment_number is required".to_string(),
        }
        .into();
        let persistence: ApiError = EntregadorError::persistence(EntregadorError::StoreError {
            message: "disk full".to_string(),
        })
        .into();

        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(persistence.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(persistence.message.starts_with("falha ao registrar entrega"));
    }
}
