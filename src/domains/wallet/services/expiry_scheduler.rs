use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use chrono::Utc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use crate::domains::wallet::services::WalletService;
use crate::shared::errors::WalletError;

/// 입금 만료 스케줄러
/// Deposit Expiry Scheduler
///
/// 역할:
/// - 주기적으로 만료 시간이 지난 pending 입금을 expired로 변경
/// - 잔액 변화 없음
/// - 실패는 로그만 남기고 다음 주기에 다시 시도
#[derive(Clone)]
pub struct DepositExpiryScheduler {
    wallet_service: WalletService,

    /// 실행 주기
    period: Duration,

    /// 스케줄러 활성화 상태
    enabled: Arc<AtomicBool>,
}

impl DepositExpiryScheduler {
    /// 새 스케줄러 생성
    /// Create new scheduler
    pub fn new(wallet_service: WalletService, period_secs: u64) -> Self {
        Self {
            wallet_service,
            period: Duration::from_secs(period_secs.max(1)),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// 스케줄러 시작 (백그라운드 태스크)
    /// Start scheduler
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();

        tracing::info!(period_secs = self.period.as_secs(), "deposit expiry scheduler started");

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !scheduler.is_enabled() {
                    continue;
                }

                if let Err(e) = scheduler.run_once().await {
                    tracing::error!(error = %e, "deposit expiry sweep failed");
                }
            }
        })
    }

    /// 스윕 1회 실행
    /// Run one sweep; returns the number of expired deposits
    pub async fn run_once(&self) -> Result<usize, WalletError> {
        let expired = self.wallet_service.expire_stale_deposits(Utc::now()).await?;
        if expired > 0 {
            tracing::info!(expired, "expired stale pending deposits");
        } else {
            tracing::debug!("no stale pending deposits");
        }
        Ok(expired)
    }

    /// 스케줄러 활성화
    /// Enable scheduler
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// 스케줄러 비활성화
    /// Disable scheduler
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// 스케줄러 상태 조회
    /// Get scheduler status
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
