use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 설정(key/value) 관련 에러
/// Settings store errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Setting not found: {key}")]
    NotFound { key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<SettingsError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: SettingsError) -> Self {
        let status = match &err {
            SettingsError::NotFound { .. } => StatusCode::NOT_FOUND,
            SettingsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SettingsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
