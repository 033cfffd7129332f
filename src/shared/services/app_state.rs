use std::sync::Arc;
use crate::shared::clients::PaymentGateway;
use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::shared::utils::SnowflakeGenerator;
use crate::domains::auth::services::state::AuthState;
use crate::domains::settings::services::state::SettingsState;
use crate::domains::wallet::services::state::WalletState;
use anyhow::{Context, Result};

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub config: Arc<AppConfig>,
    /// 프로세스 전체에서 하나만 사용하는 ID 생성기
    /// Process-wide snowflake generator
    pub ids: SnowflakeGenerator,
    pub auth_state: AuthState,
    pub settings_state: SettingsState,
    pub wallet_state: WalletState,
}

impl AppState {
    /// 모든 도메인 State를 초기화하고 조합
    /// Build every domain state
    ///
    /// 게이트웨이는 외부에서 주입 (실서버: NowPaymentsClient, 테스트: mock)
    pub fn new(db: Database, config: AppConfig, gateway: Arc<dyn PaymentGateway>) -> Result<Self> {
        // 1. 공유 서비스 생성
        let ids = SnowflakeGenerator::new(config.snowflake.machine_id)
            .context("Failed to create snowflake generator")?;

        // 2. 각 도메인 State 생성
        let auth_state = AuthState::new(db.clone(), ids.clone(), &config.auth);
        let settings_state = SettingsState::new(db.clone());
        let wallet_state = WalletState::new(
            db.clone(),
            gateway,
            ids.clone(),
            settings_state.settings_service.clone(),
            config.wallet.deposit_ttl_minutes,
            config.wallet.expiry_sweep_interval_secs,
        );

        // 3. AppState 조합
        Ok(Self {
            db,
            config: Arc::new(config),
            ids,
            auth_state,
            settings_state,
            wallet_state,
        })
    }

    /// 백그라운드 작업 시작 (입금 만료 스케줄러)
    /// Start background jobs
    pub fn start_background_jobs(&self) {
        self.wallet_state.expiry_scheduler.start();
    }
}
