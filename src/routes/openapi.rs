// OpenAPI 스키마 정의: Swagger 문서 자동 생성
use utoipa::OpenApi;

use crate::domains::auth::models::*;
use crate::domains::settings::models::*;
use crate::domains::wallet::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::auth::handlers::auth_handler::signup,
        crate::domains::auth::handlers::auth_handler::signin,
        crate::domains::auth::handlers::auth_handler::refresh,
        crate::domains::auth::handlers::auth_handler::logout,
        crate::domains::auth::handlers::auth_handler::get_me,
        crate::domains::wallet::handlers::wallet_handler::create_wallet,
        crate::domains::wallet::handlers::wallet_handler::get_wallet,
        crate::domains::wallet::handlers::wallet_handler::set_wallet_password,
        crate::domains::wallet::handlers::wallet_handler::create_deposit,
        crate::domains::wallet::handlers::wallet_handler::create_withdrawal,
        crate::domains::wallet::handlers::wallet_handler::list_transactions,
        crate::domains::wallet::handlers::wallet_handler::get_transaction,
        crate::domains::wallet::handlers::wallet_handler::cancel_transaction,
        crate::domains::wallet::handlers::wallet_handler::sync_transaction,
        crate::domains::wallet::handlers::webhook_handler::payment_ipn,
        crate::domains::wallet::handlers::admin_handler::list_all_transactions,
        crate::domains::wallet::handlers::admin_handler::approve_transaction,
        crate::domains::wallet::handlers::admin_handler::reject_transaction,
        crate::domains::wallet::handlers::admin_handler::create_adjustment,
        crate::domains::wallet::handlers::admin_handler::set_wallet_status,
        crate::domains::settings::handlers::settings_handler::list_settings,
        crate::domains::settings::handlers::settings_handler::get_deposit_addresses,
        crate::domains::settings::handlers::settings_handler::upsert_setting
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        RefreshTokenRequest,
        RefreshTokenResponse,
        LogoutRequest,
        UserResponse,
        UserRole,
        WalletStatus,
        WalletResponse,
        SetWalletPasswordRequest,
        DepositRequest,
        DepositResponse,
        WithdrawRequest,
        WithdrawDestination,
        Network,
        TransactionType,
        TransactionStatus,
        PaymentStatus,
        WalletTransaction,
        TransactionResponse,
        TransactionsResponse,
        AdminDecisionRequest,
        AdjustmentRequest,
        WalletStatusRequest,
        IpnAck,
        Setting,
        SettingValueType,
        SettingsResponse,
        UpsertSettingRequest,
        DepositAddressesResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Authentication API endpoints"),
        (name = "Wallet", description = "Wallet balance, deposits, withdrawals and gateway webhook"),
        (name = "Settings", description = "Key/value settings (deposit addresses, thresholds)"),
        (name = "Admin", description = "Admin-only wallet and settings operations")
    ),
    info(
        title = "AdPay API Server",
        description = "Wallet ledger API for the ad-account reselling platform",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
