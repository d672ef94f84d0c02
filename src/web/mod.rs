//! HTTP surface: metrics scrape endpoint and the worker report endpoints.

pub mod routes;

use crate::core::ExporterError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub use routes::{AppState, router};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Exporter(ExporterError),
    Input(String),
}

impl From<ExporterError> for WebError {
    fn from(err: ExporterError) -> Self {
        match err {
            ExporterError::Validation(msg) => WebError::Input(msg),
            other => WebError::Exporter(other),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            WebError::Exporter(ExporterError::Metrics(err)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                "metrics_error".to_string(),
            ),
            WebError::Exporter(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                "internal_error".to_string(),
            ),
            WebError::Input(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                "input_error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
