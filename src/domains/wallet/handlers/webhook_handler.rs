use crate::domains::wallet::models::IpnAck;
use crate::shared::errors::{ApiError, WalletError};
use crate::shared::services::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};

/// IPN 서명 헤더
pub const IPN_SIGNATURE_HEADER: &str = "x-nowpayments-sig";

/// 결제 게이트웨이 IPN 웹훅
/// Payment gateway IPN webhook
///
/// 서명은 원본 본문(raw body)으로 검증하므로 Json 추출기를 쓰지 않음
#[utoipa::path(
    post,
    path = "/api/wallet/ipn",
    request_body(content = String, content_type = "application/json", description = "Gateway payment payload"),
    params(("x-nowpayments-sig" = String, Header, description = "HMAC-SHA512 signature")),
    responses(
        (status = 200, description = "Update applied or ignored", body = IpnAck),
        (status = 401, description = "Invalid signature"),
        (status = 404, description = "Unknown payment"),
        (status = 422, description = "Malformed payload")
    ),
    tag = "Wallet"
)]
pub async fn payment_ipn(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IpnAck>, ApiError> {
    let signature = headers
        .get(IPN_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let ack = app_state
        .wallet_state
        .wallet_service
        .handle_ipn(&body, signature)
        .await
        .map_err(|e: WalletError| -> ApiError { e.into() })?;

    Ok(Json(ack))
}
