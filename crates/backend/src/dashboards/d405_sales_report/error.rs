use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use contracts::dashboards::d405_sales_report::ValidationError;

/// Ошибки шлюза отчёта продаж
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Network(_) | GatewayError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the client. Upstream messages are passed through unchanged.
    pub fn client_message(&self) -> String {
        match self {
            GatewayError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        GatewayError::InvalidRequest(err.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("D405 gateway error: {}", self);
        } else {
            tracing::warn!("D405 gateway error: {}", self);
        }
        (status, Json(json!({ "message": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Upstream { status: 404, message: "x".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Upstream { status: 42, message: "x".into() }.status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::Network("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_message_passthrough() {
        let err = GatewayError::Upstream {
            status: 422,
            message: "Warehouse 5 is archived".into(),
        };
        assert_eq!(err.client_message(), "Warehouse 5 is archived");
        assert_eq!(
            GatewayError::from(ValidationError::NoSelection).client_message(),
            "Invalid request: Select at least one filter value"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = GatewayError::InvalidRequest("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
