use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

/// 잘 알려진 설정 키
/// Well-known setting keys
pub mod keys {
    pub const WALLET_ADDRESS_BEP20: &str = "wallet_address_bep20";
    pub const WALLET_ADDRESS_TRC20: &str = "wallet_address_trc20";
    pub const MIN_DEPOSIT_AMOUNT: &str = "min_deposit_amount";
    pub const MIN_WITHDRAW_AMOUNT: &str = "min_withdraw_amount";

    /// 숫자(Decimal)로 읽는 키
    pub const DECIMAL_KEYS: [&str; 2] = [MIN_DEPOSIT_AMOUNT, MIN_WITHDRAW_AMOUNT];
}

/// 설정 값 타입
/// Setting value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettingValueType {
    #[default]
    String,
    /// 이미지 URL (QR 코드 등)
    Image,
}

impl SettingValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingValueType::String => "string",
            SettingValueType::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(SettingValueType::String),
            "image" => Some(SettingValueType::Image),
            _ => None,
        }
    }
}

/// 설정 (key/value)
/// Setting entry
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(as = Setting)]
pub struct Setting {
    #[schema(example = "min_deposit_amount")]
    pub key: String,
    #[schema(example = "10")]
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// 설정 변경 요청 (관리자)
/// Upsert setting request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = UpsertSettingRequest)]
pub struct UpsertSettingRequest {
    pub value: String,
    /// 생략 시 string
    pub value_type: Option<SettingValueType>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SettingsResponse)]
pub struct SettingsResponse {
    pub settings: Vec<Setting>,
}

/// 입금 수신 주소
/// Receiving addresses per network
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = DepositAddressesResponse)]
pub struct DepositAddressesResponse {
    pub bep20: Option<String>,
    pub trc20: Option<String>,
}
