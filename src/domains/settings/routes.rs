// Settings domain routes
// 설정 도메인 라우터
use axum::{routing::{get, put}, Router};
use crate::domains::settings::handlers::settings_handler;
use crate::shared::services::AppState;

/// Create settings router (/api/settings)
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings_handler::list_settings))
        .route("/deposit-addresses", get(settings_handler::get_deposit_addresses))
}

/// Create admin settings router (/api/admin/settings)
pub fn create_admin_settings_router() -> Router<AppState> {
    Router::new().route("/:key", put(settings_handler::upsert_setting))
}
