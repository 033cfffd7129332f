use crate::domains::wallet::models::{
    DepositRequest, DepositResponse, SetWalletPasswordRequest, TransactionFilter,
    TransactionResponse, TransactionsResponse, WalletResponse, WithdrawRequest,
};
use crate::shared::errors::{ApiError, WalletError};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 지갑 생성
/// Open a wallet for the authenticated user
#[utoipa::path(
    post,
    path = "/api/wallet",
    responses(
        (status = 201, description = "Wallet created", body = WalletResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Wallet already exists")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn create_wallet(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<(StatusCode, Json<WalletResponse>), ApiError> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .create_wallet(authenticated_user.user_id)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok((StatusCode::CREATED, Json(wallet.into())))
}

/// 내 지갑 조회
/// Get own wallet
#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Wallet", body = WalletResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Wallet not found")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn get_wallet(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_wallet(authenticated_user.user_id)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(wallet.into()))
}

/// 지갑 비밀번호 설정/변경
/// Set or change the wallet password
#[utoipa::path(
    put,
    path = "/api/wallet/password",
    request_body = SetWalletPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = WalletResponse),
        (status = 400, description = "Current password missing or wrong"),
        (status = 422, description = "Password too short")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn set_wallet_password(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<SetWalletPasswordRequest>,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .set_password(authenticated_user.user_id, request)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(wallet.into()))
}

/// 입금 요청
/// Request a deposit (creates a gateway payment)
#[utoipa::path(
    post,
    path = "/api/wallet/deposits",
    request_body = DepositRequest,
    responses(
        (status = 201, description = "Deposit created", body = DepositResponse),
        (status = 403, description = "Wallet locked"),
        (status = 422, description = "Amount below minimum"),
        (status = 502, description = "Payment gateway error (nothing stored)")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn create_deposit(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<DepositResponse>), ApiError> {
    let deposit = app_state
        .wallet_state
        .wallet_service
        .request_deposit(authenticated_user.user_id, request)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok((StatusCode::CREATED, Json(deposit)))
}

/// 출금 요청
/// Request a withdrawal (pending admin approval)
#[utoipa::path(
    post,
    path = "/api/wallet/withdrawals",
    request_body = WithdrawRequest,
    responses(
        (status = 201, description = "Withdrawal requested", body = TransactionResponse),
        (status = 400, description = "Insufficient balance or wrong password"),
        (status = 403, description = "Wallet locked"),
        (status = 422, description = "Invalid amount or destination")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn create_withdrawal(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(request): Json<WithdrawRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let transaction = app_state
        .wallet_state
        .wallet_service
        .request_withdraw(authenticated_user.user_id, request)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}

/// 내 거래 목록
/// List own transactions
#[utoipa::path(
    get,
    path = "/api/wallet/transactions",
    params(
        ("tx_type" = Option<String>, Query, description = "deposit | withdraw | refund | fee | cashback | service_purchase"),
        ("status" = Option<String>, Query, description = "pending | approved | rejected | completed | cancelled | expired | failed"),
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u32>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Transactions", body = TransactionsResponse),
        (status = 404, description = "Wallet not found")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = app_state
        .wallet_state
        .wallet_service
        .list_transactions(authenticated_user.user_id, &filter)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    let (per_page, _) = filter.limit_offset();
    Ok(Json(TransactionsResponse {
        transactions,
        page: filter.page.unwrap_or(1).max(1),
        per_page: per_page as u32,
    }))
}

/// 내 거래 하나 조회
/// Get one own transaction
#[utoipa::path(
    get,
    path = "/api/wallet/transactions/{id}",
    params(("id" = u64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction", body = TransactionResponse),
        (status = 403, description = "Not your transaction"),
        (status = 404, description = "Transaction not found")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = app_state
        .wallet_state
        .wallet_service
        .get_transaction(authenticated_user.user_id, id)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(TransactionResponse { transaction }))
}

/// 대기 중 거래 취소
/// Cancel own pending transaction
#[utoipa::path(
    post,
    path = "/api/wallet/transactions/{id}/cancel",
    params(("id" = u64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction cancelled", body = TransactionResponse),
        (status = 403, description = "Not your transaction"),
        (status = 409, description = "Transaction is no longer pending")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn cancel_transaction(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = app_state
        .wallet_state
        .wallet_service
        .cancel_transaction(authenticated_user.user_id, id)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(TransactionResponse { transaction }))
}

/// 게이트웨이 상태 동기화 (IPN 누락 시)
/// Poll the gateway for a deposit's status
#[utoipa::path(
    post,
    path = "/api/wallet/transactions/{id}/sync",
    params(("id" = u64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction after sync", body = TransactionResponse),
        (status = 400, description = "Not a gateway deposit"),
        (status = 502, description = "Payment gateway error")
    ),
    security(("BearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn sync_transaction(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = app_state
        .wallet_state
        .wallet_service
        .sync_payment_status(authenticated_user.user_id, id)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(TransactionResponse { transaction }))
}
