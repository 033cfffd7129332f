use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use crate::domains::auth::models::UserRole;
use crate::shared::errors::{ApiError, AuthError};
use crate::shared::services::AppState;
use serde_json::json;

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
    pub role: UserRole,
}

/// 관리자 사용자 (role = admin인 토큰만 통과)
/// Authenticated admin
///
/// 사용법:
/// ```rust,ignore
/// pub async fn approve(State(app_state): State<AppState>, admin: AdminUser) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: u64,
    pub email: String,
}

fn unauthorized(message: &str) -> ApiError {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message })))
}

/// Authorization: Bearer 토큰 추출
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .ok_or_else(|| unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Invalid authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid authorization format. Expected: 'Bearer <token>'"))
}

/// AuthenticatedUser를 Axum Extractor로 구현
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = state
            .auth_state
            .jwt_service
            .verify_access_token(token)
            .map_err(|e: AuthError| -> ApiError { e.into() })?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            tracing::warn!(user_id = user.user_id, "admin endpoint called without admin role");
            return Err(AuthError::Forbidden.into());
        }

        Ok(AdminUser {
            user_id: user.user_id,
            email: user.email,
        })
    }
}
