// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

pub mod openapi;

use axum::Router;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::settings::routes::{create_admin_settings_router, create_settings_router};
use crate::domains::wallet::routes::{create_admin_wallet_router, create_wallet_router};

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", create_auth_router())
        .nest("/api/wallet", create_wallet_router())
        .nest("/api/settings", create_settings_router())
        .nest("/api/admin/wallet", create_admin_wallet_router())
        .nest("/api/admin/settings", create_admin_settings_router())
}
