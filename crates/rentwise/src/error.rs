use crate::apartments::{ApartmentError, ComparisonServiceError, RepositoryError};
use crate::config::ConfigError;
use crate::import::ListingImportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Service(ComparisonServiceError),
    Import(ListingImportError),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(err) => service_status(err),
            AppError::Import(_) => StatusCode::BAD_REQUEST,
            AppError::Json(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP status for a failed comparison operation.
pub fn service_status(err: &ComparisonServiceError) -> StatusCode {
    match err {
        ComparisonServiceError::Apartment(
            ApartmentError::NotFound(_) | ApartmentError::PhotoNotFound { .. },
        ) => StatusCode::NOT_FOUND,
        ComparisonServiceError::Apartment(ApartmentError::InvalidDate(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ComparisonServiceError::Photo(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ComparisonServiceError::Import(ListingImportError::Fetch(_)) => StatusCode::BAD_GATEWAY,
        ComparisonServiceError::Import(_) => StatusCode::BAD_REQUEST,
        ComparisonServiceError::Repository(RepositoryError::Unavailable(_))
        | ComparisonServiceError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ComparisonServiceError::Repository(RepositoryError::Corrupt(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Service(err) => write!(f, "{}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Csv(err) => write!(f, "csv error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Service(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Csv(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ComparisonServiceError> for AppError {
    fn from(value: ComparisonServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<ListingImportError> for AppError {
    fn from(value: ListingImportError) -> Self {
        Self::Import(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
