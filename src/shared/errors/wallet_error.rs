use thiserror::Error;
use axum::{http::StatusCode, Json};
use rust_decimal::Decimal;
use serde_json::json;

/// 지갑/원장 관련 에러
/// Wallet and ledger errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not found for user {user_id}")]
    WalletNotFound { user_id: u64 },

    #[error("Wallet already exists for user {user_id}")]
    WalletAlreadyExists { user_id: u64 },

    #[error("Transaction not found: id={id}")]
    TransactionNotFound { id: u64 },

    #[error("Payment not found: payment_id={payment_id}")]
    PaymentNotFound { payment_id: String },

    /// 지갑이 잠겨 있음
    /// Wallet is locked
    #[error("Wallet is locked")]
    WalletLocked,

    /// 잔액 부족
    /// Insufficient balance
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Decimal, required: Decimal },

    /// 허용되지 않는 상태 전이 (이미 종료된 거래 등)
    /// Illegal status transition
    #[error("Cannot {action} transaction in status '{status}'")]
    InvalidTransition { action: &'static str, status: String },

    /// 거래 타입이 작업과 맞지 않음
    #[error("Operation '{action}' is not allowed for '{tx_type}' transactions")]
    WrongTransactionType { action: &'static str, tx_type: String },

    /// 본인 거래가 아님
    #[error("Transaction {id} does not belong to this user")]
    NotOwner { id: u64 },

    #[error("Wallet password required")]
    PasswordRequired,

    #[error("Invalid wallet password")]
    InvalidPassword,

    /// 입력값 검증 실패 (422)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// IPN 서명 검증 실패
    #[error("Invalid IPN signature")]
    InvalidSignature,

    /// 결제 게이트웨이 에러
    /// Payment gateway error
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WalletError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WalletError::WalletNotFound { .. }
            | WalletError::TransactionNotFound { .. }
            | WalletError::PaymentNotFound { .. } => StatusCode::NOT_FOUND,
            WalletError::WalletAlreadyExists { .. } | WalletError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            WalletError::WalletLocked | WalletError::NotOwner { .. } => StatusCode::FORBIDDEN,
            WalletError::InsufficientBalance { .. }
            | WalletError::WrongTransactionType { .. }
            | WalletError::PasswordRequired
            | WalletError::InvalidPassword => StatusCode::BAD_REQUEST,
            WalletError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WalletError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WalletError::Gateway(_) => StatusCode::BAD_GATEWAY,
            WalletError::DatabaseError(_) | WalletError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// WalletError를 HTTP 응답으로 변환
impl From<WalletError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: WalletError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!(error = %err, "wallet request failed");
        }
        (status, Json(json!({ "error": err.to_string() })))
    }
}
