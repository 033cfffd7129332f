// Settings domain state
// 설정 도메인 상태
use crate::shared::database::Database;
use crate::domains::settings::services::SettingsService;

/// Settings domain state
#[derive(Clone)]
pub struct SettingsState {
    pub settings_service: SettingsService,
}

impl SettingsState {
    pub fn new(db: Database) -> Self {
        Self {
            settings_service: SettingsService::new(db),
        }
    }
}
