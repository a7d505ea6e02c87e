use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::services::conflict::ConflictReport;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Unknown event category: {0}")]
    UnknownCategory(String),
    #[error("Invalid recurrence unit: {0}")]
    InvalidRecurrenceUnit(String),
    #[error("Booking conflicts on {} date(s)", .0.len())]
    BookingConflict(ConflictReport),
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl AppError {
    /// Serializable shape for the caller's transport layer. Conflict
    /// rejections carry the full per-date breakdown so the requester can
    /// decide whether to override; store failures are logged and flattened.
    pub fn detail(&self) -> ErrorDetail {
        if let AppError::Database(e) = self {
            error!("Database error: {:?}", e);
            return ErrorDetail {
                error: "Internal server error".to_string(),
                conflicts: None,
            };
        }
        ErrorDetail {
            error: self.to_string(),
            conflicts: match self {
                AppError::BookingConflict(report) => Some(report.clone()),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<ConflictReport>,
}
