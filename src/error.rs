use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::Environment;
use crate::store::StoreError;
use crate::validation::ValidationError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not authorized")]
    Unauthorized,
    #[error("not found: address {0}")]
    NotFound(String),
    #[error("address {0} already exists")]
    Conflict(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => ApiError::Conflict(id),
            StoreError::Poisoned => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            code,
        }
    }

    pub fn from_api_error(err: &ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(msg) => Self::new("bad_request", msg, 400),
            ApiError::Validation(err) => Self::new("validation_error", &err.to_string(), 400),
            ApiError::Unauthorized => Self::new("unauthorized", "Not Authorized", 401),
            ApiError::NotFound(_) => Self::new("not_found", &err.to_string(), 404),
            ApiError::Conflict(_) => Self::new("conflict", &err.to_string(), 409),
            ApiError::Internal(msg) => Self::new("internal_error", msg, 500),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = self {
            return ServerFault { detail }.into_response();
        }

        let body = ErrorResponse::from_api_error(&self);
        let status = StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

/// Marker carried on a 500 response until the error translator renders it
/// for the current environment.
#[derive(Debug, Clone)]
pub struct ServerFault {
    pub detail: String,
}

impl ServerFault {
    /// Body shown to the client: the raw detail outside production
    pub fn render(&self, environment: Environment) -> Response {
        let message = if environment.is_production() {
            "server error"
        } else {
            self.detail.as_str()
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("internal_error", message, 500)),
        )
            .into_response()
    }
}

impl IntoResponse for ServerFault {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Converts a caught handler panic into a server fault
pub fn panic_fault(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ServerFault { detail }.into_response()
}
