//! Error taxonomy shared by every API handler.
//!
//! All variants render as `{"success": false, "message": ...}`. Diagnostic
//! detail is logged where the error is mapped and never reaches the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Client-fixable input problem.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Resource already exists.
    #[error("{0}")]
    Conflict(&'static str),

    /// Store or unexpected failure.
    #[error("{0}")]
    Internal(&'static str),

    /// Store could not be reached.
    #[error("{0}")]
    Connection(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Connection(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every failed API response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
