use crate::domains::wallet::models::{Network, PaymentStatus};
use crate::shared::config::GatewayConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use std::time::Duration;

type HmacSha512 = Hmac<Sha512>;

/// 게이트웨이 결제 생성 파라미터
/// Parameters for creating a gateway payment
#[derive(Debug, Clone)]
pub struct CreatePayment {
    /// 우리 쪽 거래 ID (Snowflake)
    pub order_id: u64,
    /// USD 금액
    pub amount: Decimal,
    pub network: Network,
    pub description: String,
}

/// 게이트웨이 결제 정보
/// Gateway payment details
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPayment {
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    pub pay_address: String,
    pub pay_amount: Decimal,
    pub pay_currency: String,
}

/// 결제 게이트웨이 인터페이스
/// Payment gateway interface
///
/// # 구현체
/// - `NowPaymentsClient`: 실제 REST API
/// - 테스트: tests/common의 MockGateway
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 결제 생성 (입금 주소 발급)
    /// Create a payment and receive a deposit address
    async fn create_payment(&self, request: &CreatePayment) -> Result<GatewayPayment>;

    /// 네트워크별 최소 결제 금액 (USD)
    /// Minimum payable amount for a network
    async fn min_amount(&self, network: Network) -> Result<Decimal>;

    /// 결제 상태 조회 (폴링)
    /// Query payment status
    async fn payment_status(&self, payment_id: &str) -> Result<GatewayPayment>;

    /// IPN 서명 검증
    /// Verify IPN signature over the raw request body
    fn verify_ipn(&self, body: &[u8], signature: &str) -> bool;
}

// NOWPayments API 클라이언트
// NOWPayments REST client
pub struct NowPaymentsClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    ipn_secret: String,
    ipn_callback_url: String,
}

impl NowPaymentsClient {
    // 클라이언트 생성
    // Create new client instance
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            ipn_secret: config.ipn_secret.clone(),
            ipn_callback_url: config.ipn_callback_url.clone(),
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Payment gateway {} returned error: {} - {}", what, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse payment gateway {} response", what))
    }
}

#[async_trait]
impl PaymentGateway for NowPaymentsClient {
    async fn create_payment(&self, request: &CreatePayment) -> Result<GatewayPayment> {
        let url = format!("{}/payment", self.base_url);
        let body = CreatePaymentBody {
            price_amount: price_amount(request.amount)?,
            price_currency: "usd",
            pay_currency: request.network.pay_currency(),
            order_id: request.order_id.to_string(),
            order_description: &request.description,
            ipn_callback_url: &self.ipn_callback_url,
        };

        tracing::debug!(order_id = request.order_id, network = %request.network, "creating gateway payment");

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send create payment request")?;

        let raw: PaymentRaw = Self::parse_response(response, "create payment").await?;
        raw.try_into()
    }

    async fn min_amount(&self, network: Network) -> Result<Decimal> {
        let url = format!(
            "{}/min-amount?currency_from={}&currency_to={}&fiat_equivalent=usd",
            self.base_url,
            network.pay_currency(),
            network.pay_currency()
        );

        let response = self
            .http_client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Failed to send min amount request")?;

        let raw: MinAmountRaw = Self::parse_response(response, "min amount").await?;

        // fiat_equivalent가 있으면 USD 기준 금액 사용
        Ok(raw.fiat_equivalent.unwrap_or(raw.min_amount))
    }

    async fn payment_status(&self, payment_id: &str) -> Result<GatewayPayment> {
        let url = format!("{}/payment/{}", self.base_url, payment_id);

        let response = self
            .http_client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Failed to send payment status request")?;

        let raw: PaymentRaw = Self::parse_response(response, "payment status").await?;
        raw.try_into()
    }

    fn verify_ipn(&self, body: &[u8], signature: &str) -> bool {
        verify_ipn_signature(&self.ipn_secret, body, signature)
    }
}

/// IPN 서명 계산
/// Compute the IPN signature: HMAC-SHA512 over the JSON body with keys sorted
pub fn sign_ipn_body(secret: &str, body: &[u8]) -> Result<String> {
    let sorted = sorted_json(body)?;
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid IPN secret: {}", e))?;
    mac.update(sorted.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// IPN 서명 검증 (상수 시간 비교)
/// Verify an IPN signature in constant time
pub fn verify_ipn_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let Ok(sorted) = sorted_json(body) else {
        return false;
    };
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(sorted.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// 게이트웨이 요청용 USD 금액 (변환 실패 시 0으로 보내지 않고 에러)
fn price_amount(amount: Decimal) -> Result<f64> {
    amount
        .to_f64()
        .filter(|value| value.is_finite() && *value > 0.0)
        .with_context(|| format!("Amount {} cannot be sent to the payment gateway", amount))
}

fn sorted_json(body: &[u8]) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).context("IPN body is not valid JSON")?;
    serde_json::to_string(&sort_keys(value)).context("Failed to serialize IPN body")
}

// 모든 깊이의 객체 키를 정렬 (serde_json preserve_order 여부와 무관)
fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}

// =====================================================
// NOWPayments 원시 요청/응답 모델 (내부용)
// =====================================================

#[derive(Debug, Serialize)]
struct CreatePaymentBody<'a> {
    price_amount: f64,
    price_currency: &'a str,
    pay_currency: &'a str,
    order_id: String,
    order_description: &'a str,
    ipn_callback_url: &'a str,
}

/// 결제 생성/조회 응답 (IPN 본문도 같은 형식)
/// Payment payload; IPN bodies share this shape
#[derive(Debug, Deserialize)]
pub struct PaymentRaw {
    #[serde(deserialize_with = "string_or_number")]
    pub payment_id: String,
    pub payment_status: String,
    #[serde(default)]
    pub pay_address: Option<String>,
    #[serde(default)]
    pub pay_amount: Option<Decimal>,
    #[serde(default)]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl TryFrom<PaymentRaw> for GatewayPayment {
    type Error = anyhow::Error;

    fn try_from(raw: PaymentRaw) -> Result<Self> {
        let payment_status = raw
            .payment_status
            .parse::<PaymentStatus>()
            .with_context(|| format!("Unknown payment status for payment {}", raw.payment_id))?;

        Ok(GatewayPayment {
            payment_id: raw.payment_id,
            payment_status,
            pay_address: raw.pay_address.unwrap_or_default(),
            pay_amount: raw.pay_amount.unwrap_or_default(),
            pay_currency: raw.pay_currency.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MinAmountRaw {
    min_amount: Decimal,
    #[serde(default)]
    fiat_equivalent: Option<Decimal>,
}

/// payment_id는 숫자 또는 문자열로 옴
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid payment_id: {}", other))),
    }
}
