use crate::shared::database::{Database, SettingRepository};
use crate::domains::settings::models::{
    keys, DepositAddressesResponse, Setting, SettingValueType, UpsertSettingRequest,
};
use crate::domains::wallet::models::Network;
use crate::shared::errors::SettingsError;
use rust_decimal::Decimal;

/// 키 최대 길이 (configs.key VARCHAR(100))
const MAX_KEY_LEN: usize = 100;

// 설정 서비스
// SettingsService: reads and writes the key/value config store
#[derive(Clone)]
pub struct SettingsService {
    db: Database,
}

impl SettingsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 설정 하나 조회
    /// Get one setting
    pub async fn get(&self, key: &str) -> Result<Setting, SettingsError> {
        let repo = SettingRepository::new(self.db.pool().clone());

        repo.get(key)
            .await
            .map_err(|e| SettingsError::DatabaseError(format!("{:#}", e)))?
            .ok_or_else(|| SettingsError::NotFound { key: key.to_string() })
    }

    /// 전체 설정 조회
    /// List all settings
    pub async fn list(&self) -> Result<Vec<Setting>, SettingsError> {
        let repo = SettingRepository::new(self.db.pool().clone());

        repo.list()
            .await
            .map_err(|e| SettingsError::DatabaseError(format!("{:#}", e)))
    }

    /// 설정 생성/수정 (관리자)
    /// Upsert a setting after validating it
    pub async fn upsert(
        &self,
        key: &str,
        request: UpsertSettingRequest,
    ) -> Result<Setting, SettingsError> {
        let value_type = request.value_type.unwrap_or_default();
        validate_setting(key, request.value.trim(), value_type)?;

        let repo = SettingRepository::new(self.db.pool().clone());
        let setting = repo
            .upsert(key, request.value.trim(), value_type, request.description.as_deref())
            .await
            .map_err(|e| SettingsError::DatabaseError(format!("{:#}", e)))?;

        tracing::info!(key = %setting.key, "setting updated");
        Ok(setting)
    }

    /// Decimal 설정 조회 (없거나 비어 있으면 기본값)
    /// Read a decimal setting, falling back to a default
    pub async fn get_decimal(&self, key: &str, default: Decimal) -> Result<Decimal, SettingsError> {
        let repo = SettingRepository::new(self.db.pool().clone());
        let setting = repo
            .get(key)
            .await
            .map_err(|e| SettingsError::DatabaseError(format!("{:#}", e)))?;

        match setting {
            Some(s) => parse_decimal_or(&s.value, default).ok_or_else(|| {
                SettingsError::Validation(format!("setting '{}' is not a number: '{}'", key, s.value))
            }),
            None => Ok(default),
        }
    }

    /// 네트워크별 입금 주소
    /// Receiving addresses configured for each network
    pub async fn deposit_addresses(&self) -> Result<DepositAddressesResponse, SettingsError> {
        Ok(DepositAddressesResponse {
            bep20: self.address_for(Network::Bep20).await?,
            trc20: self.address_for(Network::Trc20).await?,
        })
    }

    async fn address_for(&self, network: Network) -> Result<Option<String>, SettingsError> {
        let repo = SettingRepository::new(self.db.pool().clone());
        let setting = repo
            .get(network.address_setting_key())
            .await
            .map_err(|e| SettingsError::DatabaseError(format!("{:#}", e)))?;

        Ok(setting.map(|s| s.value).filter(|v| !v.is_empty()))
    }
}

/// 빈 값은 기본값, 숫자가 아니면 None
fn parse_decimal_or(value: &str, default: Decimal) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return Some(default);
    }
    value.parse::<Decimal>().ok()
}

/// 설정 키/값 검증
/// Validate a setting before it is stored
pub fn validate_setting(
    key: &str,
    value: &str,
    value_type: SettingValueType,
) -> Result<(), SettingsError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(SettingsError::Validation(format!(
            "key must be 1..={} characters",
            MAX_KEY_LEN
        )));
    }
    if !key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(SettingsError::Validation(
            "key may only contain lowercase letters, digits and '_'".to_string(),
        ));
    }

    if keys::DECIMAL_KEYS.contains(&key) {
        match value.parse::<Decimal>() {
            Ok(v) if v >= Decimal::ZERO => {}
            _ => {
                return Err(SettingsError::Validation(format!(
                    "'{}' must be a non-negative number",
                    key
                )))
            }
        }
    }

    if value_type == SettingValueType::Image
        && !value.is_empty()
        && !(value.starts_with("https://") || value.starts_with("http://"))
    {
        return Err(SettingsError::Validation(
            "image settings must hold an http(s) URL".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_setting_keys() {
        assert!(validate_setting("wallet_address_bep20", "0xabc", SettingValueType::String).is_ok());
        assert!(validate_setting("", "x", SettingValueType::String).is_err());
        assert!(validate_setting("Bad-Key", "x", SettingValueType::String).is_err());
        assert!(validate_setting(&"k".repeat(101), "x", SettingValueType::String).is_err());
    }

    #[test]
    fn test_validate_decimal_settings() {
        assert!(validate_setting(keys::MIN_DEPOSIT_AMOUNT, "12.5", SettingValueType::String).is_ok());
        assert!(validate_setting(keys::MIN_DEPOSIT_AMOUNT, "-1", SettingValueType::String).is_err());
        assert!(validate_setting(keys::MIN_WITHDRAW_AMOUNT, "ten", SettingValueType::String).is_err());
    }

    #[test]
    fn test_validate_image_settings() {
        assert!(validate_setting("qr_bep20", "https://cdn.example.com/qr.png", SettingValueType::Image).is_ok());
        assert!(validate_setting("qr_bep20", "qr.png", SettingValueType::Image).is_err());
    }

    #[test]
    fn test_parse_decimal_or_default() {
        let default = Decimal::from(10);
        assert_eq!(parse_decimal_or("", default), Some(default));
        assert_eq!(parse_decimal_or(" 25 ", default), Some(Decimal::from(25)));
        assert_eq!(parse_decimal_or("abc", default), None);
    }
}
