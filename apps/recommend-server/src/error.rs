//! HTTP error mapping for the recommend server: every `EngineError` becomes
//! a status code plus a small JSON body a client can branch on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resonance_recommend_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Engine(EngineError::NoValidSeeds) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Engine(EngineError::UnknownStrategy(_)) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::UnknownVariant(_, _)) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::InvalidK { .. }) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Engine(EngineError::NoValidSeeds) => "NO_VALID_SEEDS",
            Self::Engine(EngineError::NotFound(_)) => "NOT_FOUND",
            Self::Engine(EngineError::UnknownStrategy(_)) => "UNKNOWN_STRATEGY",
            Self::Engine(EngineError::UnknownVariant(_, _)) => "UNKNOWN_VARIANT",
            Self::Engine(EngineError::InvalidK { .. }) => "INVALID_K",
            Self::Engine(EngineError::Cancelled) => "CANCELLED",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        (status, Json(ErrorResponse { code: self.error_code(), message: self.to_string() })).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
