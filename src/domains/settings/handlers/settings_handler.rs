use crate::domains::settings::models::{
    DepositAddressesResponse, Setting, SettingsResponse, UpsertSettingRequest,
};
use crate::shared::errors::{ApiError, SettingsError};
use crate::shared::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::shared::services::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

/// 전체 설정 조회
/// List settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings", body = SettingsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("BearerAuth" = [])),
    tag = "Settings"
)]
pub async fn list_settings(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = app_state
        .settings_state
        .settings_service
        .list()
        .await
        .map_err(|e: SettingsError| -> ApiError { e.into() })?;

    Ok(Json(SettingsResponse { settings }))
}

/// 입금 수신 주소 조회
/// Receiving addresses per network
#[utoipa::path(
    get,
    path = "/api/settings/deposit-addresses",
    responses(
        (status = 200, description = "Deposit addresses", body = DepositAddressesResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("BearerAuth" = [])),
    tag = "Settings"
)]
pub async fn get_deposit_addresses(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<DepositAddressesResponse>, ApiError> {
    let addresses = app_state
        .settings_state
        .settings_service
        .deposit_addresses()
        .await
        .map_err(|e: SettingsError| -> ApiError { e.into() })?;

    Ok(Json(addresses))
}

/// 설정 생성/수정 (관리자)
/// Upsert a setting (admin)
#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpsertSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = Setting),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Invalid key or value")
    ),
    security(("BearerAuth" = [])),
    tag = "Admin"
)]
pub async fn upsert_setting(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(key): Path<String>,
    Json(request): Json<UpsertSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    tracing::info!(admin_id = admin.user_id, key = %key, "admin updating setting");

    let setting = app_state
        .settings_state
        .settings_service
        .upsert(&key, request)
        .await
        .map_err(|e: SettingsError| -> ApiError { e.into() })?;

    Ok(Json(setting))
}
