// Wallet domain routes
// 지갑 도메인 라우터
use axum::{routing::{get, post, put}, Router};
use crate::domains::wallet::handlers::{admin_handler, wallet_handler, webhook_handler};
use crate::shared::services::AppState;

/// Create wallet router (/api/wallet)
/// 지갑 라우터 생성
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/", post(wallet_handler::create_wallet).get(wallet_handler::get_wallet))
        .route("/password", put(wallet_handler::set_wallet_password))
        .route("/deposits", post(wallet_handler::create_deposit))
        .route("/withdrawals", post(wallet_handler::create_withdrawal))
        .route("/transactions", get(wallet_handler::list_transactions))
        .route("/transactions/:id", get(wallet_handler::get_transaction))
        .route("/transactions/:id/cancel", post(wallet_handler::cancel_transaction))
        .route("/transactions/:id/sync", post(wallet_handler::sync_transaction))
        .route("/ipn", post(webhook_handler::payment_ipn))  // 서명 검증 (JWT 아님)
}

/// Create admin wallet router (/api/admin/wallet)
/// 관리자 지갑 라우터 생성
pub fn create_admin_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(admin_handler::list_all_transactions))
        .route("/transactions/:id/approve", post(admin_handler::approve_transaction))
        .route("/transactions/:id/reject", post(admin_handler::reject_transaction))
        .route("/adjustments", post(admin_handler::create_adjustment))
        .route("/:user_id/status", put(admin_handler::set_wallet_status))
}
