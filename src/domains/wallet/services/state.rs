// Wallet domain state
// 지갑 도메인 상태
use std::sync::Arc;
use crate::shared::clients::PaymentGateway;
use crate::shared::database::Database;
use crate::shared::utils::SnowflakeGenerator;
use crate::domains::settings::services::SettingsService;
use crate::domains::wallet::services::{DepositExpiryScheduler, WalletService};

/// Wallet domain state
/// 지갑 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
    /// 입금 만료 스케줄러
    pub expiry_scheduler: DepositExpiryScheduler,
}

impl WalletState {
    /// Create WalletState
    /// WalletState 생성 (스케줄러는 생성만 하고 시작하지 않음)
    pub fn new(
        db: Database,
        gateway: Arc<dyn PaymentGateway>,
        ids: SnowflakeGenerator,
        settings: SettingsService,
        deposit_ttl_minutes: i64,
        expiry_sweep_interval_secs: u64,
    ) -> Self {
        let wallet_service = WalletService::new(db, gateway, ids, settings, deposit_ttl_minutes);
        let expiry_scheduler =
            DepositExpiryScheduler::new(wallet_service.clone(), expiry_sweep_interval_secs);

        Self {
            wallet_service,
            expiry_scheduler,
        }
    }
}
