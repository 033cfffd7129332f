use crate::domains::wallet::models::{
    AdjustmentRequest, AdminDecisionRequest, TransactionFilter, TransactionResponse,
    TransactionsResponse, WalletResponse, WalletStatusRequest,
};
use crate::shared::errors::{ApiError, WalletError};
use crate::shared::middleware::auth::AdminUser;
use crate::shared::services::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 전체 거래 목록 (관리자)
/// List all transactions
#[utoipa::path(
    get,
    path = "/api/admin/wallet/transactions",
    params(
        ("tx_type" = Option<String>, Query, description = "Transaction type filter"),
        ("status" = Option<String>, Query, description = "Status filter"),
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Transactions", body = TransactionsResponse),
        (status = 403, description = "Admin role required")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn list_all_transactions(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = app_state
        .wallet_state
        .wallet_service
        .list_all_transactions(&filter)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    let (per_page, _) = filter.limit_offset();
    Ok(Json(TransactionsResponse {
        transactions,
        page: filter.page.unwrap_or(1).max(1),
        per_page: per_page as u32,
    }))
}

/// 출금 승인
/// Approve a pending withdrawal
#[utoipa::path(
    post,
    path = "/api/admin/wallet/transactions/{id}/approve",
    params(("id" = u64, Path, description = "Transaction ID")),
    request_body = AdminDecisionRequest,
    responses(
        (status = 200, description = "Withdrawal approved", body = TransactionResponse),
        (status = 400, description = "Insufficient balance or not a withdrawal"),
        (status = 409, description = "Transaction is no longer pending")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn approve_transaction(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<u64>,
    request: Option<Json<AdminDecisionRequest>>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let note = request.and_then(|Json(r)| r.note);

    let transaction = app_state
        .wallet_state
        .wallet_service
        .approve_withdrawal(admin.user_id, id, note)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(TransactionResponse { transaction }))
}

/// 거래 거절
/// Reject a pending transaction
#[utoipa::path(
    post,
    path = "/api/admin/wallet/transactions/{id}/reject",
    params(("id" = u64, Path, description = "Transaction ID")),
    request_body = AdminDecisionRequest,
    responses(
        (status = 200, description = "Transaction rejected", body = TransactionResponse),
        (status = 409, description = "Transaction is no longer pending")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn reject_transaction(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<u64>,
    request: Option<Json<AdminDecisionRequest>>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let note = request.and_then(|Json(r)| r.note);

    let transaction = app_state
        .wallet_state
        .wallet_service
        .reject_transaction(admin.user_id, id, note)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(TransactionResponse { transaction }))
}

/// 잔액 조정 (환불/수수료/캐시백/서비스 구매)
/// Post a balance adjustment
#[utoipa::path(
    post,
    path = "/api/admin/wallet/adjustments",
    request_body = AdjustmentRequest,
    responses(
        (status = 201, description = "Adjustment posted", body = TransactionResponse),
        (status = 400, description = "Insufficient balance or not an adjustment type"),
        (status = 404, description = "Wallet not found")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn create_adjustment(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<AdjustmentRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let transaction = app_state
        .wallet_state
        .wallet_service
        .adjust_balance(admin.user_id, request)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}

/// 지갑 잠금/해제
/// Lock or unlock a user's wallet
#[utoipa::path(
    put,
    path = "/api/admin/wallet/{user_id}/status",
    params(("user_id" = u64, Path, description = "Wallet owner user ID")),
    request_body = WalletStatusRequest,
    responses(
        (status = 200, description = "Wallet status updated", body = WalletResponse),
        (status = 404, description = "Wallet not found")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn set_wallet_status(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<u64>,
    Json(request): Json<WalletStatusRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .set_wallet_status(user_id, request.status)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(wallet.into()))
}
