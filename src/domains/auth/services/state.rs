// Auth domain state
// 인증 도메인 상태
use crate::shared::config::AuthConfig;
use crate::shared::database::Database;
use crate::shared::utils::SnowflakeGenerator;
use crate::domains::auth::services::{AuthService, JwtService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
}

impl AuthState {
    /// Create AuthState from config
    pub fn new(db: Database, ids: SnowflakeGenerator, config: &AuthConfig) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.access_token_hours);

        Self {
            auth_service: AuthService::new(db, jwt_service.clone(), ids, config.refresh_token_days),
            jwt_service,
        }
    }
}
