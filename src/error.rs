//! Error types for the object gateway
//!
//! Store failures are carried as the client's own `RedisError` so callers see
//! exactly what the store reported.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Facade Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// Error reported by (or while talking to) the remote store
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Bad store configuration or unreachable store at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FacadeError {
    /// Returns true when the error means the store could not be reached.
    pub fn is_connectivity(&self) -> bool {
        match self {
            FacadeError::Store(err) => {
                err.is_io_error()
                    || err.is_timeout()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
            }
            _ => false,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FacadeError {
    fn into_response(self) -> Response {
        let status = match &self {
            FacadeError::Store(_) if self.is_connectivity() => StatusCode::SERVICE_UNAVAILABLE,
            FacadeError::Store(_) => StatusCode::CONFLICT,
            FacadeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FacadeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            FacadeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, FacadeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use redis::ErrorKind;

    #[test]
    fn test_type_error_maps_to_conflict() {
        let err: FacadeError = redis::RedisError::from((
            ErrorKind::TypeError,
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        ))
        .into();
        assert!(!err.is_connectivity());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_io_error_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: FacadeError = redis::RedisError::from(io).into();
        assert!(err.is_connectivity());
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invalid_request_maps_to_bad_request() {
        let err = FacadeError::InvalidRequest("Key cannot be empty".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
