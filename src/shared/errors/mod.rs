// Shared errors
pub mod auth_error;
pub mod settings_error;
pub mod wallet_error;

pub use auth_error::*;
pub use settings_error::*;
pub use wallet_error::*;

use axum::{http::StatusCode, Json};

/// 핸들러 공통 에러 응답 타입
/// Error response type shared by all handlers
pub type ApiError = (StatusCode, Json<serde_json::Value>);
