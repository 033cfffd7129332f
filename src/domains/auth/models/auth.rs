use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;
use crate::shared::errors::AuthError;

/// 비밀번호 최소 길이
pub const MIN_PASSWORD_LEN: usize = 8;

/// 회원가입 요청
/// Signup request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    #[schema(example = "buyer@agency.vn")]
    pub email: String,

    /// 비밀번호 (argon2로 해싱됨)
    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "agency-buyer")]
    pub username: Option<String>,
}

impl SignupRequest {
    /// 입력값 검증
    /// Validate signup input
    pub fn validate(&self) -> Result<(), AuthError> {
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(AuthError::Validation("email is not valid".to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub message: String,
}

/// 로그인 요청
/// Signin request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = SigninRequest)]
pub struct SigninRequest {
    #[schema(example = "buyer@agency.vn")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// 로그인 응답
/// Signin response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SigninResponse)]
pub struct SigninResponse {
    pub user: UserResponse,

    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    pub access_token: String,

    /// Refresh Token (긴 수명, DB에는 해시만 저장)
    /// Refresh Token (long lifetime, stored hashed)
    pub refresh_token: String,

    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = LogoutRequest)]
pub struct LogoutRequest {
    pub refresh_token: String,
}
