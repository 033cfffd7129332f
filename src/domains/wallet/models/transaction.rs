use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

// =====================================================
// WalletTransaction 모델
// =====================================================
// 역할: 잔액에 영향을 주는 단일 이벤트 (입금, 출금, 환불, 수수료, 캐시백, 서비스 구매)
//
// 상태 흐름:
// - pending → completed / approved (잔액 반영)
// - pending → rejected / cancelled / expired / failed (잔액 변화 없음)
// - pending 이외의 상태는 종료 상태이며 변경 불가
// =====================================================

/// 거래 타입
/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Refund,
    Fee,
    Cashback,
    ServicePurchase,
}

/// 잔액 변화 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Refund => "refund",
            TransactionType::Fee => "fee",
            TransactionType::Cashback => "cashback",
            TransactionType::ServicePurchase => "service_purchase",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            TransactionType::Deposit | TransactionType::Refund | TransactionType::Cashback => {
                Direction::Credit
            }
            TransactionType::Withdraw | TransactionType::Fee | TransactionType::ServicePurchase => {
                Direction::Debit
            }
        }
    }

    /// 관리자가 직접 기록하는 조정 거래인지 여부
    pub fn is_adjustment(&self) -> bool {
        !matches!(self, TransactionType::Deposit | TransactionType::Withdraw)
    }
}

/// 거래 상태
/// Transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
    Expired,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Expired => "expired",
            TransactionStatus::Failed => "failed",
        }
    }

    /// 종료 상태 (더 이상 변경 불가)
    /// Terminal state (immutable)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// 결제 게이트웨이 상태 (IPN / 조회 응답의 payment_status)
/// Payment gateway status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Waiting,
    Confirming,
    Confirmed,
    Sending,
    PartiallyPaid,
    Finished,
    Failed,
    Refunded,
    Expired,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Confirming => "confirming",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Sending => "sending",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Finished => "finished",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Expired => "expired",
        }
    }
}

/// 입금/출금 네트워크 (USDT)
/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Network {
    #[serde(rename = "BEP20")]
    Bep20,
    #[serde(rename = "TRC20")]
    Trc20,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bep20 => "BEP20",
            Network::Trc20 => "TRC20",
        }
    }

    /// 게이트웨이 통화 코드
    /// Gateway currency ticker for USDT on this network
    pub fn pay_currency(&self) -> &'static str {
        match self {
            Network::Bep20 => "usdtbsc",
            Network::Trc20 => "usdttrc20",
        }
    }

    /// 수신 주소 설정 키
    pub fn address_setting_key(&self) -> &'static str {
        match self {
            Network::Bep20 => "wallet_address_bep20",
            Network::Trc20 => "wallet_address_trc20",
        }
    }
}

/// DB 문자열 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

macro_rules! impl_from_str {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseEnumError { kind: $kind, value: s.to_string() })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_from_str!(TransactionType, "transaction type", [
    TransactionType::Deposit,
    TransactionType::Withdraw,
    TransactionType::Refund,
    TransactionType::Fee,
    TransactionType::Cashback,
    TransactionType::ServicePurchase,
]);

impl_from_str!(TransactionStatus, "transaction status", [
    TransactionStatus::Pending,
    TransactionStatus::Approved,
    TransactionStatus::Rejected,
    TransactionStatus::Completed,
    TransactionStatus::Cancelled,
    TransactionStatus::Expired,
    TransactionStatus::Failed,
]);

impl_from_str!(PaymentStatus, "payment status", [
    PaymentStatus::Waiting,
    PaymentStatus::Confirming,
    PaymentStatus::Confirmed,
    PaymentStatus::Sending,
    PaymentStatus::PartiallyPaid,
    PaymentStatus::Finished,
    PaymentStatus::Failed,
    PaymentStatus::Refunded,
    PaymentStatus::Expired,
]);

impl_from_str!(Network, "network", [Network::Bep20, Network::Trc20]);

/// 출금 목적지 (은행 또는 암호화폐 주소)
/// Withdrawal destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WithdrawDestination {
    Bank {
        bank_name: String,
        account_number: String,
        account_holder: String,
    },
    Crypto {
        network: Network,
        address: String,
    },
}

impl WithdrawDestination {
    pub fn network(&self) -> Option<Network> {
        match self {
            WithdrawDestination::Bank { .. } => None,
            WithdrawDestination::Crypto { network, .. } => Some(*network),
        }
    }
}

/// 지갑 거래 (DB 저장용)
/// Wallet transaction record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = WalletTransaction)]
pub struct WalletTransaction {
    /// Snowflake ID
    pub id: u64,
    pub wallet_id: u64,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,

    /// 금액 (USD 기준, 항상 양수)
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,

    pub network: Option<Network>,

    /// 게이트웨이 결제 ID (입금만)
    /// Gateway payment id (deposits only)
    pub payment_id: Option<String>,

    /// 마지막으로 받은 게이트웨이 상태
    pub payment_status: Option<PaymentStatus>,

    pub pay_address: Option<String>,

    #[schema(value_type = Option<String>)]
    pub pay_amount: Option<Decimal>,

    pub pay_currency: Option<String>,

    pub destination: Option<WithdrawDestination>,

    pub description: Option<String>,

    /// 관리자 메모 (승인/거절 사유)
    pub admin_note: Option<String>,

    /// 처리한 관리자 ID
    pub processed_by: Option<u64>,

    pub expires_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 거래 생성 시 사용하는 내부 모델 (Repository에서 사용)
/// Internal model for inserting a transaction
#[derive(Debug, Clone)]
pub struct WalletTransactionCreate {
    pub id: u64,
    pub wallet_id: u64,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub network: Option<Network>,
    pub payment_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub pay_address: Option<String>,
    pub pay_amount: Option<Decimal>,
    pub pay_currency: Option<String>,
    pub destination: Option<WithdrawDestination>,
    pub description: Option<String>,
    pub processed_by: Option<u64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl WalletTransactionCreate {
    /// 최소 필드만 채운 기본값
    pub fn new(id: u64, wallet_id: u64, tx_type: TransactionType, amount: Decimal) -> Self {
        Self {
            id,
            wallet_id,
            tx_type,
            status: TransactionStatus::Pending,
            amount,
            network: None,
            payment_id: None,
            payment_status: None,
            pay_address: None,
            pay_amount: None,
            pay_currency: None,
            destination: None,
            description: None,
            processed_by: None,
            expires_at: None,
            processed_at: None,
        }
    }
}

/// 거래 목록 필터
/// Transaction list filter
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TransactionFilter {
    pub tx_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    /// 1부터 시작
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl TransactionFilter {
    pub const MAX_PER_PAGE: u32 = 100;

    /// (limit, offset)
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(20).clamp(1, Self::MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        (i64::from(per_page), i64::from(page - 1) * i64::from(per_page))
    }
}
