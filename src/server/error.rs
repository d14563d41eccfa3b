//! HTTP error responses
//!
//! Every failure leaves the server as `{"error": ..., "details": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::types::BizError;

#[derive(Debug)]
pub struct ApiError {
    pub status_code: StatusCode,
    pub message: String,
    pub details: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: details.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<BizError> for ApiError {
    fn from(err: BizError) -> Self {
        let message = err.to_string();
        if err.is_client_error() {
            Self::bad_request(message, format!("{:?}", err))
        } else {
            Self::internal(message, format!("{:?}", err))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            error!(status = self.status_code.as_u16(), details = %self.details, "{}", self.message);
        } else {
            warn!(status = self.status_code.as_u16(), "{}", self.message);
        }

        let body = json!({
            "error": self.message,
            "details": self.details,
        });
        (self.status_code, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_missing_maps_to_400() {
        let err: ApiError = BizError::UpstreamInputMissing("generate first".into()).into();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "generate first");
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err: ApiError = BizError::Config("bad".into()).into();
        assert_eq!(err.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Config error: bad");
    }
}
