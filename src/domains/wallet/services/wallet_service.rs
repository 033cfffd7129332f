use std::sync::Arc;
use crate::shared::clients::{CreatePayment, GatewayPayment, PaymentGateway, PaymentRaw};
use crate::shared::database::{Database, StatusUpdate, WalletRepository, WalletTransactionRepository};
use crate::shared::utils::SnowflakeGenerator;
use crate::shared::errors::{SettingsError, WalletError};
use crate::domains::settings::models::keys;
use crate::domains::settings::services::SettingsService;
use crate::domains::wallet::models::{
    AdjustmentRequest, DepositRequest, DepositResponse, IpnAck, PaymentStatus,
    SetWalletPasswordRequest, TransactionFilter, TransactionStatus, TransactionType, Wallet,
    WalletStatus, WalletTransaction, WalletTransactionCreate, WithdrawDestination,
    WithdrawRequest,
};
use crate::domains::wallet::services::ledger::{self, GatewayOutcome, Transition};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, Transaction};

/// 설정이 없을 때 사용하는 최소 입금/출금 금액 (USD)
const DEFAULT_MIN_AMOUNT: i64 = 10;

/// 만료 스윕 1회당 최대 처리 건수
const EXPIRY_BATCH_SIZE: i64 = 500;

/// 지갑 비밀번호 최소 길이
const MIN_WALLET_PASSWORD_LEN: usize = 6;

fn db_err(e: anyhow::Error) -> WalletError {
    WalletError::DatabaseError(format!("{:#}", e))
}

fn sqlx_err(e: sqlx::Error) -> WalletError {
    WalletError::DatabaseError(e.to_string())
}

fn settings_err(e: SettingsError) -> WalletError {
    WalletError::Internal(format!("Failed to read wallet settings: {}", e))
}

/// 지갑 서비스
/// 역할: 원장 상태 머신(ledger)의 전이를 DB 트랜잭션 안에서 실행
/// WalletService: runs ledger transitions atomically under row locks
///
/// 잔액이 바뀌는 모든 작업은 다음 순서를 따름:
/// 1. `BEGIN`
/// 2. 거래 행 잠금 → 지갑 행 잠금 (`SELECT ... FOR UPDATE`)
/// 3. ledger 함수로 전이 계산 (잘못된 전이는 여기서 거절)
/// 4. 잔액/상태 저장 후 `COMMIT`
#[derive(Clone)]
pub struct WalletService {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
    ids: SnowflakeGenerator,
    settings: SettingsService,
    deposit_ttl: Duration,
}

impl WalletService {
    /// 생성자
    /// Constructor
    pub fn new(
        db: Database,
        gateway: Arc<dyn PaymentGateway>,
        ids: SnowflakeGenerator,
        settings: SettingsService,
        deposit_ttl_minutes: i64,
    ) -> Self {
        Self {
            db,
            gateway,
            ids,
            settings,
            deposit_ttl: Duration::minutes(deposit_ttl_minutes),
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, WalletError> {
        self.db.pool().begin().await.map_err(sqlx_err)
    }

    // =====================================================
    // 지갑 관리
    // =====================================================

    /// 새 지갑 생성 (사용자당 1개)
    /// Open a wallet for user
    pub async fn create_wallet(&self, user_id: u64) -> Result<Wallet, WalletError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());

        // 1. 기존 지갑 확인 (명확한 에러 메시지를 위해)
        let existing = wallet_repo.get_by_user(user_id).await.map_err(db_err)?;
        if existing.is_some() {
            return Err(WalletError::WalletAlreadyExists { user_id });
        }

        // 2. 저장 (UNIQUE 제약이 최종 보호 역할)
        let wallet = wallet_repo
            .create(self.ids.next_id(), user_id)
            .await
            .map_err(|e| {
                let error_msg = format!("{:#}", e);
                if error_msg.contains("unique constraint") || error_msg.contains("duplicate key") {
                    WalletError::WalletAlreadyExists { user_id }
                } else {
                    WalletError::DatabaseError(error_msg)
                }
            })?;

        tracing::info!(user_id, wallet_id = wallet.id, "wallet created");
        Ok(wallet)
    }

    /// 사용자 지갑 조회
    /// Get wallet of user
    pub async fn get_wallet(&self, user_id: u64) -> Result<Wallet, WalletError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        wallet_repo
            .get_by_user(user_id)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::WalletNotFound { user_id })
    }

    /// 지갑 비밀번호 설정/변경
    /// Set or change the wallet password
    pub async fn set_password(
        &self,
        user_id: u64,
        request: SetWalletPasswordRequest,
    ) -> Result<Wallet, WalletError> {
        if request.new_password.chars().count() < MIN_WALLET_PASSWORD_LEN {
            return Err(WalletError::Validation(format!(
                "wallet password must be at least {} characters",
                MIN_WALLET_PASSWORD_LEN
            )));
        }

        let wallet = self.get_wallet(user_id).await?;

        // 이미 설정되어 있으면 기존 비밀번호 확인
        if let Some(hash) = wallet.password_hash.as_deref() {
            let current = request
                .current_password
                .as_deref()
                .ok_or(WalletError::PasswordRequired)?;
            Self::verify_password(current, hash)?;
        }

        let password_hash = Self::hash_password(&request.new_password)?;
        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        wallet_repo
            .set_password_hash(wallet.id, &password_hash)
            .await
            .map_err(db_err)?;

        tracing::info!(user_id, wallet_id = wallet.id, "wallet password updated");

        Ok(Wallet {
            password_hash: Some(password_hash),
            updated_at: Utc::now(),
            ..wallet
        })
    }

    /// 지갑 잠금/해제 (관리자)
    /// Lock or unlock a wallet
    pub async fn set_wallet_status(
        &self,
        user_id: u64,
        status: WalletStatus,
    ) -> Result<Wallet, WalletError> {
        let wallet_repo = WalletRepository::new(self.db.pool().clone());
        let wallet = wallet_repo
            .set_status(user_id, status)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::WalletNotFound { user_id })?;

        tracing::info!(user_id, status = status.as_str(), "wallet status changed");
        Ok(wallet)
    }

    // =====================================================
    // 입금 / 출금 요청
    // =====================================================

    /// 입금 요청
    /// Request a deposit
    ///
    /// 게이트웨이 결제를 먼저 생성하고 성공했을 때만 거래를 저장함
    /// (게이트웨이 에러 시 아무것도 저장하지 않음)
    pub async fn request_deposit(
        &self,
        user_id: u64,
        request: DepositRequest,
    ) -> Result<DepositResponse, WalletError> {
        ledger::validate_amount(request.amount)?;

        let wallet = self.get_wallet(user_id).await?;
        if wallet.status == WalletStatus::Locked {
            return Err(WalletError::WalletLocked);
        }

        // 1. 최소 금액 확인 (설정값 + 게이트웨이 최소값)
        let min_deposit = self
            .settings
            .get_decimal(keys::MIN_DEPOSIT_AMOUNT, Decimal::from(DEFAULT_MIN_AMOUNT))
            .await
            .map_err(settings_err)?;
        if request.amount < min_deposit {
            return Err(WalletError::Validation(format!(
                "minimum deposit amount is {}",
                min_deposit
            )));
        }

        let gateway_min = self
            .gateway
            .min_amount(request.network)
            .await
            .map_err(|e| WalletError::Gateway(format!("{:#}", e)))?;
        if request.amount < gateway_min {
            return Err(WalletError::Validation(format!(
                "minimum deposit amount for {} is {}",
                request.network, gateway_min
            )));
        }

        // 2. 게이트웨이 결제 생성 (order_id = 거래 ID)
        let id = self.ids.next_id();
        let payment = self
            .gateway
            .create_payment(&CreatePayment {
                order_id: id,
                amount: request.amount,
                network: request.network,
                description: format!("Wallet deposit {}", id),
            })
            .await
            .map_err(|e| {
                tracing::warn!(user_id, error = %format!("{:#}", e), "gateway payment creation failed");
                WalletError::Gateway(format!("{:#}", e))
            })?;

        // 3. 대기 중 입금 저장
        let expires_at = Utc::now() + self.deposit_ttl;
        let data = WalletTransactionCreate {
            network: Some(request.network),
            payment_id: Some(payment.payment_id.clone()),
            payment_status: Some(payment.payment_status),
            pay_address: Some(payment.pay_address.clone()),
            pay_amount: Some(payment.pay_amount),
            pay_currency: Some(payment.pay_currency.clone()),
            description: Some(format!("Deposit via {}", request.network)),
            expires_at: Some(expires_at),
            ..WalletTransactionCreate::new(id, wallet.id, TransactionType::Deposit, request.amount)
        };

        let transaction = WalletTransactionRepository::insert(self.db.pool(), &data)
            .await
            .map_err(db_err)?;

        tracing::info!(
            user_id,
            transaction_id = transaction.id,
            payment_id = %payment.payment_id,
            amount = %request.amount,
            network = %request.network,
            "deposit requested"
        );

        Ok(DepositResponse {
            transaction,
            pay_address: payment.pay_address,
            pay_amount: payment.pay_amount,
            pay_currency: payment.pay_currency,
            expires_at,
        })
    }

    /// 출금 요청 (관리자 승인 대기)
    /// Request a withdrawal; the balance is debited on approval
    pub async fn request_withdraw(
        &self,
        user_id: u64,
        request: WithdrawRequest,
    ) -> Result<WalletTransaction, WalletError> {
        ledger::validate_amount(request.amount)?;
        validate_destination(&request.destination)?;

        let min_withdraw = self
            .settings
            .get_decimal(keys::MIN_WITHDRAW_AMOUNT, Decimal::from(DEFAULT_MIN_AMOUNT))
            .await
            .map_err(settings_err)?;
        if request.amount < min_withdraw {
            return Err(WalletError::Validation(format!(
                "minimum withdrawal amount is {}",
                min_withdraw
            )));
        }

        let mut db_tx = self.begin().await?;

        // 1. 지갑 잠금
        let wallet = WalletRepository::lock_by_user(&mut *db_tx, user_id)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::WalletNotFound { user_id })?;
        if wallet.status == WalletStatus::Locked {
            return Err(WalletError::WalletLocked);
        }

        // 2. 지갑 비밀번호 확인
        if let Some(hash) = wallet.password_hash.as_deref() {
            let password = request.password.as_deref().ok_or(WalletError::PasswordRequired)?;
            Self::verify_password(password, hash)?;
        }

        // 3. 대기 중 출금을 차감한 잔액으로 확인
        let pending = WalletTransactionRepository::sum_pending_withdrawals(&mut *db_tx, wallet.id)
            .await
            .map_err(db_err)?;
        ledger::check_withdrawable(wallet.balance, pending, request.amount)?;

        // 4. 대기 중 출금 저장
        let data = WalletTransactionCreate {
            network: request.destination.network(),
            destination: Some(request.destination),
            description: Some("Withdrawal request".to_string()),
            ..WalletTransactionCreate::new(
                self.ids.next_id(),
                wallet.id,
                TransactionType::Withdraw,
                request.amount,
            )
        };
        let transaction = WalletTransactionRepository::insert(&mut *db_tx, &data)
            .await
            .map_err(db_err)?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(
            user_id,
            transaction_id = transaction.id,
            amount = %transaction.amount,
            "withdrawal requested"
        );
        Ok(transaction)
    }

    // =====================================================
    // 상태 전이 (사용자/관리자)
    // =====================================================

    /// 사용자 취소 (본인 거래, pending만)
    /// Cancel own pending transaction
    pub async fn cancel_transaction(
        &self,
        user_id: u64,
        transaction_id: u64,
    ) -> Result<WalletTransaction, WalletError> {
        let mut db_tx = self.begin().await?;

        let (transaction, wallet) = Self::lock_pair(&mut db_tx, transaction_id).await?;
        if wallet.user_id != user_id {
            return Err(WalletError::NotOwner { id: transaction_id });
        }

        let transition = ledger::cancel(&transaction)?;
        let updated = Self::settle(
            &mut db_tx,
            &transaction,
            &wallet,
            transition,
            StatusUpdate {
                status: transition.to,
                payment_status: None,
                admin_note: None,
                processed_by: None,
                processed_at: Some(Utc::now()),
            },
        )
        .await?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(user_id, transaction_id, "transaction cancelled by user");
        Ok(updated)
    }

    /// 출금 승인 (관리자) - 잔액 차감
    /// Approve a pending withdrawal
    pub async fn approve_withdrawal(
        &self,
        admin_id: u64,
        transaction_id: u64,
        note: Option<String>,
    ) -> Result<WalletTransaction, WalletError> {
        let mut db_tx = self.begin().await?;

        let (transaction, wallet) = Self::lock_pair(&mut db_tx, transaction_id).await?;

        // 행 잠금 상태에서 잔액 재확인
        let transition = ledger::approve_withdrawal(&transaction, wallet.balance)?;
        let updated = Self::settle(
            &mut db_tx,
            &transaction,
            &wallet,
            transition,
            StatusUpdate {
                status: transition.to,
                payment_status: None,
                admin_note: note,
                processed_by: Some(admin_id),
                processed_at: Some(Utc::now()),
            },
        )
        .await?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(
            admin_id,
            transaction_id,
            amount = %transaction.amount,
            "withdrawal approved"
        );
        Ok(updated)
    }

    /// 거절 (관리자) - 잔액 변화 없음
    /// Reject a pending transaction
    pub async fn reject_transaction(
        &self,
        admin_id: u64,
        transaction_id: u64,
        note: Option<String>,
    ) -> Result<WalletTransaction, WalletError> {
        let mut db_tx = self.begin().await?;

        let (transaction, wallet) = Self::lock_pair(&mut db_tx, transaction_id).await?;

        let transition = ledger::reject(&transaction)?;
        let updated = Self::settle(
            &mut db_tx,
            &transaction,
            &wallet,
            transition,
            StatusUpdate {
                status: transition.to,
                payment_status: None,
                admin_note: note,
                processed_by: Some(admin_id),
                processed_at: Some(Utc::now()),
            },
        )
        .await?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(admin_id, transaction_id, "transaction rejected");
        Ok(updated)
    }

    /// 잔액 조정 (관리자): 환불, 수수료, 캐시백, 서비스 구매
    /// Post an adjustment; created directly as completed
    pub async fn adjust_balance(
        &self,
        admin_id: u64,
        request: AdjustmentRequest,
    ) -> Result<WalletTransaction, WalletError> {
        let mut db_tx = self.begin().await?;

        let wallet = WalletRepository::lock_by_user(&mut *db_tx, request.user_id)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::WalletNotFound { user_id: request.user_id })?;

        let transition = ledger::adjustment(request.tx_type, request.amount, wallet.balance)?;
        let new_balance = ledger::apply_delta(wallet.balance, transition.balance_delta)?;
        WalletRepository::set_balance(&mut *db_tx, wallet.id, new_balance)
            .await
            .map_err(db_err)?;

        let now = Utc::now();
        let data = WalletTransactionCreate {
            status: transition.to,
            description: request.description,
            processed_by: Some(admin_id),
            processed_at: Some(now),
            ..WalletTransactionCreate::new(
                self.ids.next_id(),
                wallet.id,
                request.tx_type,
                request.amount,
            )
        };
        let transaction = WalletTransactionRepository::insert(&mut *db_tx, &data)
            .await
            .map_err(db_err)?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(
            admin_id,
            user_id = request.user_id,
            transaction_id = transaction.id,
            tx_type = %request.tx_type,
            amount = %request.amount,
            balance = %new_balance,
            "balance adjusted"
        );
        Ok(transaction)
    }

    // =====================================================
    // 게이트웨이 업데이트 (IPN / 폴링)
    // =====================================================

    /// IPN 처리: 서명 검증 → 본문 파싱 → 상태 반영
    /// Handle a gateway webhook
    pub async fn handle_ipn(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<IpnAck, WalletError> {
        let signature = signature.ok_or(WalletError::InvalidSignature)?;
        if !self.gateway.verify_ipn(body, signature) {
            tracing::warn!("IPN rejected: invalid signature");
            return Err(WalletError::InvalidSignature);
        }

        let raw: PaymentRaw = serde_json::from_slice(body)
            .map_err(|e| WalletError::Validation(format!("invalid IPN body: {}", e)))?;
        let payment = GatewayPayment::try_from(raw)
            .map_err(|e| WalletError::Validation(format!("{:#}", e)))?;

        tracing::info!(
            payment_id = %payment.payment_id,
            payment_status = payment.payment_status.as_str(),
            "IPN received"
        );

        self.apply_payment_update(&payment.payment_id, payment.payment_status)
            .await
    }

    /// 게이트웨이 상태 조회 후 반영 (IPN 누락 대비)
    /// Poll the gateway for a deposit's status and apply it
    pub async fn sync_payment_status(
        &self,
        user_id: u64,
        transaction_id: u64,
    ) -> Result<WalletTransaction, WalletError> {
        let transaction = self.get_transaction(user_id, transaction_id).await?;

        let payment_id = match (&transaction.payment_id, transaction.tx_type) {
            (Some(payment_id), TransactionType::Deposit) => payment_id.clone(),
            _ => {
                return Err(WalletError::WrongTransactionType {
                    action: "sync",
                    tx_type: transaction.tx_type.to_string(),
                })
            }
        };

        // 이미 종료된 거래는 게이트웨이를 호출하지 않음
        if transaction.status.is_terminal() {
            return Ok(transaction);
        }

        let payment = self
            .gateway
            .payment_status(&payment_id)
            .await
            .map_err(|e| WalletError::Gateway(format!("{:#}", e)))?;

        self.apply_payment_update(&payment_id, payment.payment_status)
            .await?;

        self.find_transaction(transaction_id).await
    }

    /// 게이트웨이 상태 반영 (IPN과 폴링 공통)
    /// Apply a gateway status under row locks
    ///
    /// 종료된 거래에 대한 중복 업데이트는 `ignored = true`로 응답하고 아무것도 바꾸지 않음
    pub async fn apply_payment_update(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<IpnAck, WalletError> {
        let mut db_tx = self.begin().await?;

        let transaction = WalletTransactionRepository::lock_by_payment_id(&mut *db_tx, payment_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| WalletError::PaymentNotFound { payment_id: payment_id.to_string() })?;

        let ack = |transaction_status: TransactionStatus, ignored: bool| IpnAck {
            payment_id: payment_id.to_string(),
            payment_status: status,
            transaction_status,
            ignored,
        };

        match ledger::on_payment_update(&transaction, status)? {
            GatewayOutcome::AlreadySettled => {
                // 잠금만 해제 (변경 없음)
                db_tx.rollback().await.map_err(sqlx_err)?;
                tracing::info!(
                    payment_id,
                    transaction_id = transaction.id,
                    status = transaction.status.as_str(),
                    "gateway update ignored: transaction already settled"
                );
                Ok(ack(transaction.status, true))
            }
            GatewayOutcome::InProgress => {
                let updated = WalletTransactionRepository::update_payment_status(
                    &mut *db_tx,
                    transaction.id,
                    status,
                )
                .await
                .map_err(db_err)?;
                db_tx.commit().await.map_err(sqlx_err)?;
                Ok(ack(updated.status, false))
            }
            GatewayOutcome::Settle(transition) => {
                let wallet = Self::lock_wallet_of(&mut db_tx, &transaction).await?;
                let updated = Self::settle(
                    &mut db_tx,
                    &transaction,
                    &wallet,
                    transition,
                    StatusUpdate {
                        status: transition.to,
                        payment_status: Some(status),
                        admin_note: None,
                        processed_by: None,
                        processed_at: Some(Utc::now()),
                    },
                )
                .await?;
                db_tx.commit().await.map_err(sqlx_err)?;

                tracing::info!(
                    payment_id,
                    transaction_id = updated.id,
                    status = updated.status.as_str(),
                    credited = %transition.balance_delta,
                    "deposit settled"
                );
                Ok(ack(updated.status, false))
            }
        }
    }

    // =====================================================
    // 만료 스윕
    // =====================================================

    /// 만료 시간이 지난 대기 중 입금을 expired로 변경
    /// Expire stale pending deposits; returns how many were expired
    ///
    /// 개별 거래 실패는 로그만 남기고 다음 스윕에서 다시 시도
    pub async fn expire_stale_deposits(&self, now: DateTime<Utc>) -> Result<usize, WalletError> {
        let repo = WalletTransactionRepository::new(self.db.pool().clone());
        let ids = repo
            .find_expired_pending_deposits(now, EXPIRY_BATCH_SIZE)
            .await
            .map_err(db_err)?;

        let mut expired = 0;
        for id in ids {
            match self.expire_one(id, now).await {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(transaction_id = id, error = %e, "failed to expire deposit");
                }
            }
        }

        Ok(expired)
    }

    async fn expire_one(&self, transaction_id: u64, now: DateTime<Utc>) -> Result<bool, WalletError> {
        let mut db_tx = self.begin().await?;

        let Some(transaction) = WalletTransactionRepository::lock_by_id(&mut *db_tx, transaction_id)
            .await
            .map_err(db_err)?
        else {
            return Ok(false);
        };

        // 조회 후 IPN이 먼저 처리된 경우 종료 상태 → 건너뜀
        if transaction.status.is_terminal() {
            return Ok(false);
        }

        let Some(transition) = ledger::expire(&transaction, now)? else {
            return Ok(false);
        };

        WalletTransactionRepository::update_status(
            &mut *db_tx,
            transaction.id,
            &StatusUpdate {
                status: transition.to,
                payment_status: None,
                admin_note: None,
                processed_by: None,
                processed_at: Some(now),
            },
        )
        .await
        .map_err(db_err)?;

        db_tx.commit().await.map_err(sqlx_err)?;

        tracing::info!(transaction_id, "pending deposit expired");
        Ok(true)
    }

    // =====================================================
    // 조회
    // =====================================================

    /// 본인 거래 목록
    /// List own transactions
    pub async fn list_transactions(
        &self,
        user_id: u64,
        filter: &TransactionFilter,
    ) -> Result<Vec<WalletTransaction>, WalletError> {
        let wallet = self.get_wallet(user_id).await?;
        let repo = WalletTransactionRepository::new(self.db.pool().clone());
        repo.list(Some(wallet.id), filter).await.map_err(db_err)
    }

    /// 전체 거래 목록 (관리자)
    /// List all transactions
    pub async fn list_all_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<WalletTransaction>, WalletError> {
        let repo = WalletTransactionRepository::new(self.db.pool().clone());
        repo.list(None, filter).await.map_err(db_err)
    }

    /// 본인 거래 하나 조회
    /// Get one own transaction
    pub async fn get_transaction(
        &self,
        user_id: u64,
        transaction_id: u64,
    ) -> Result<WalletTransaction, WalletError> {
        let transaction = self.find_transaction(transaction_id).await?;
        let wallet = self.get_wallet(user_id).await?;
        if transaction.wallet_id != wallet.id {
            return Err(WalletError::NotOwner { id: transaction_id });
        }
        Ok(transaction)
    }

    async fn find_transaction(&self, transaction_id: u64) -> Result<WalletTransaction, WalletError> {
        let repo = WalletTransactionRepository::new(self.db.pool().clone());
        repo.get_by_id(transaction_id)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::TransactionNotFound { id: transaction_id })
    }

    // =====================================================
    // 내부 헬퍼
    // =====================================================

    /// 거래 → 지갑 순서로 잠금
    async fn lock_pair(
        conn: &mut PgConnection,
        transaction_id: u64,
    ) -> Result<(WalletTransaction, Wallet), WalletError> {
        let transaction = WalletTransactionRepository::lock_by_id(&mut *conn, transaction_id)
            .await
            .map_err(db_err)?
            .ok_or(WalletError::TransactionNotFound { id: transaction_id })?;
        let wallet = Self::lock_wallet_of(&mut *conn, &transaction).await?;
        Ok((transaction, wallet))
    }

    async fn lock_wallet_of(
        conn: &mut PgConnection,
        transaction: &WalletTransaction,
    ) -> Result<Wallet, WalletError> {
        WalletRepository::lock_by_id(&mut *conn, transaction.wallet_id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                WalletError::Internal(format!(
                    "wallet {} of transaction {} is missing",
                    transaction.wallet_id, transaction.id
                ))
            })
    }

    /// 전이 저장: 잔액 변화 → 상태 변경
    async fn settle(
        conn: &mut PgConnection,
        transaction: &WalletTransaction,
        wallet: &Wallet,
        transition: Transition,
        update: StatusUpdate,
    ) -> Result<WalletTransaction, WalletError> {
        if !transition.balance_delta.is_zero() {
            let new_balance = ledger::apply_delta(wallet.balance, transition.balance_delta)?;
            WalletRepository::set_balance(&mut *conn, wallet.id, new_balance)
                .await
                .map_err(db_err)?;
        }

        WalletTransactionRepository::update_status(&mut *conn, transaction.id, &update)
            .await
            .map_err(db_err)
    }

    fn hash_password(password: &str) -> Result<String, WalletError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| WalletError::Internal(format!("Failed to hash wallet password: {}", e)))
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), WalletError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| WalletError::Internal(format!("Invalid wallet password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| WalletError::InvalidPassword)
    }
}

/// 출금 목적지 필수 필드 확인
/// Validate withdrawal destination fields
pub fn validate_destination(destination: &WithdrawDestination) -> Result<(), WalletError> {
    let missing = match destination {
        WithdrawDestination::Bank { bank_name, account_number, account_holder } => [
            ("bank_name", bank_name),
            ("account_number", account_number),
            ("account_holder", account_holder),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name),
        WithdrawDestination::Crypto { address, .. } => {
            address.trim().is_empty().then_some("address")
        }
    };

    match missing {
        Some(field) => Err(WalletError::Validation(format!("destination.{} is required", field))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::wallet::models::Network;

    #[test]
    fn test_validate_destination() {
        let bank = WithdrawDestination::Bank {
            bank_name: "Vietcombank".to_string(),
            account_number: " ".to_string(),
            account_holder: "NGUYEN VAN A".to_string(),
        };
        match validate_destination(&bank) {
            Err(WalletError::Validation(msg)) => assert!(msg.contains("account_number")),
            other => panic!("unexpected result: {:?}", other),
        }

        let crypto = WithdrawDestination::Crypto {
            network: Network::Bep20,
            address: "0x9f8c".to_string(),
        };
        assert!(validate_destination(&crypto).is_ok());

        let empty = WithdrawDestination::Crypto { network: Network::Trc20, address: String::new() };
        assert!(validate_destination(&empty).is_err());
    }

    #[test]
    fn test_wallet_password_hash_round_trip() {
        let hash = WalletService::hash_password("s3cret-pin").unwrap();
        assert!(WalletService::verify_password("s3cret-pin", &hash).is_ok());
        assert!(matches!(
            WalletService::verify_password("wrong", &hash),
            Err(WalletError::InvalidPassword)
        ));
    }
}
