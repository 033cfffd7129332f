use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use crate::domains::wallet::models::{Wallet, WalletStatus};

const WALLET_COLUMNS: &str =
    "id, user_id, balance, status, password_hash, created_at, updated_at";

/// 지갑 Repository
/// Wallet persistence
///
/// 잔액 변경은 반드시 `lock_*`으로 행을 잠근 트랜잭션 안에서 `set_balance` 호출
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 지갑 생성
    /// Create wallet (balance 0, active)
    pub async fn create(&self, id: u64, user_id: u64) -> Result<Wallet> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO wallets (id, user_id, balance, status, created_at, updated_at)
            VALUES ($1, $2, 0, 'active', $3, $3)
            RETURNING {}
            "#,
            WALLET_COLUMNS
        ))
        .bind(id as i64)
        .bind(user_id as i64)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create wallet")?;

        map_wallet(&row)
    }

    /// 사용자 ID로 지갑 조회
    /// Get wallet by user ID
    pub async fn get_by_user(&self, user_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallets WHERE user_id = $1",
            WALLET_COLUMNS
        ))
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by user")?;

        row.as_ref().map(map_wallet).transpose()
    }

    /// 지갑 행 잠금 (사용자 ID)
    /// Lock wallet row by user ID (SELECT ... FOR UPDATE)
    pub async fn lock_by_user(conn: &mut PgConnection, user_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallets WHERE user_id = $1 FOR UPDATE",
            WALLET_COLUMNS
        ))
        .bind(user_id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock wallet by user")?;

        row.as_ref().map(map_wallet).transpose()
    }

    /// 지갑 행 잠금 (지갑 ID)
    /// Lock wallet row by wallet ID
    pub async fn lock_by_id(conn: &mut PgConnection, wallet_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallets WHERE id = $1 FOR UPDATE",
            WALLET_COLUMNS
        ))
        .bind(wallet_id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock wallet")?;

        row.as_ref().map(map_wallet).transpose()
    }

    /// 잔액 저장 (잠금 후 호출)
    /// Persist a new balance; caller must hold the row lock
    pub async fn set_balance(conn: &mut PgConnection, wallet_id: u64, balance: Decimal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(balance)
        .bind(Utc::now())
        .bind(wallet_id as i64)
        .execute(&mut *conn)
        .await
        .context("Failed to update wallet balance")?;

        Ok(())
    }

    /// 출금 비밀번호 저장
    pub async fn set_password_hash(&self, wallet_id: u64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE wallets SET password_hash = $1, updated_at = $2 WHERE id = $3")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(wallet_id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to update wallet password")?;

        Ok(())
    }

    /// 지갑 상태 변경 (잠금/해제)
    pub async fn set_status(&self, user_id: u64, status: WalletStatus) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE wallets
            SET status = $1, updated_at = $2
            WHERE user_id = $3
            RETURNING {}
            "#,
            WALLET_COLUMNS
        ))
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update wallet status")?;

        row.as_ref().map(map_wallet).transpose()
    }
}

fn map_wallet(row: &PgRow) -> Result<Wallet> {
    let status: String = row.get("status");

    Ok(Wallet {
        id: row.get::<i64, _>("id") as u64,
        user_id: row.get::<i64, _>("user_id") as u64,
        balance: row.get("balance"),
        status: WalletStatus::parse(&status)
            .with_context(|| format!("Unknown wallet status '{}'", status))?,
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
