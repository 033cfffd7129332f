use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::transaction::{
    Network, PaymentStatus, TransactionStatus, TransactionType, WalletTransaction,
    WithdrawDestination,
};

/// 지갑 상태
/// Wallet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WalletStatus {
    Active,
    Locked,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletStatus::Active => "active",
            WalletStatus::Locked => "locked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(WalletStatus::Active),
            "locked" => Some(WalletStatus::Locked),
            _ => None,
        }
    }
}

/// 지갑 (DB 엔티티)
/// Wallet entity
///
/// 잔액은 거래(WalletTransaction)를 통해서만 변경됨
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: u64,
    pub user_id: u64,
    pub balance: Decimal,
    pub status: WalletStatus,
    /// 출금 비밀번호 (argon2 해시, 선택)
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =====================================================
// 요청 모델 (Request)
// =====================================================

/// 입금 요청
/// Deposit request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = DepositRequest)]
pub struct DepositRequest {
    /// 입금 금액 (USD)
    #[schema(value_type = String, example = "50")]
    pub amount: Decimal,

    #[schema(example = "BEP20")]
    pub network: Network,
}

/// 출금 요청
/// Withdraw request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = WithdrawRequest)]
pub struct WithdrawRequest {
    #[schema(value_type = String, example = "25")]
    pub amount: Decimal,

    pub destination: WithdrawDestination,

    /// 지갑 비밀번호 (설정된 경우 필수)
    /// Wallet password (required when the wallet has one)
    pub password: Option<String>,
}

/// 지갑 비밀번호 설정/변경 요청
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = SetWalletPasswordRequest)]
pub struct SetWalletPasswordRequest {
    /// 기존 비밀번호 (이미 설정된 경우 필수)
    pub current_password: Option<String>,
    pub new_password: String,
}

/// 관리자 처리 요청 (승인/거절 메모)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(as = AdminDecisionRequest)]
pub struct AdminDecisionRequest {
    pub note: Option<String>,
}

/// 관리자 잔액 조정 요청 (환불/수수료/캐시백/서비스 구매)
/// Admin balance adjustment request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = AdjustmentRequest)]
pub struct AdjustmentRequest {
    pub user_id: u64,
    pub tx_type: TransactionType,
    #[schema(value_type = String, example = "5")]
    pub amount: Decimal,
    pub description: Option<String>,
}

/// 지갑 잠금/해제 요청
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = WalletStatusRequest)]
pub struct WalletStatusRequest {
    pub status: WalletStatus,
}

// =====================================================
// 응답 모델 (Response)
// =====================================================

/// 지갑 응답 (비밀번호 해시 제외)
/// Wallet response (without password hash)
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = WalletResponse)]
pub struct WalletResponse {
    pub id: u64,
    pub user_id: u64,
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
    pub status: WalletStatus,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            id: wallet.id,
            user_id: wallet.user_id,
            balance: wallet.balance,
            status: wallet.status,
            has_password: wallet.password_hash.is_some(),
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

/// 입금 생성 응답 (결제 주소 포함)
/// Deposit response with payment instructions
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = DepositResponse)]
pub struct DepositResponse {
    pub transaction: WalletTransaction,
    pub pay_address: String,
    #[schema(value_type = String)]
    pub pay_amount: Decimal,
    pub pay_currency: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionResponse)]
pub struct TransactionResponse {
    pub transaction: WalletTransaction,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionsResponse)]
pub struct TransactionsResponse {
    pub transactions: Vec<WalletTransaction>,
    pub page: u32,
    pub per_page: u32,
}

/// IPN 처리 결과
/// IPN acknowledgement
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = IpnAck)]
pub struct IpnAck {
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    pub transaction_status: TransactionStatus,
    /// 이미 종료된 거래라서 무시됨 (중복 IPN)
    pub ignored: bool,
}
