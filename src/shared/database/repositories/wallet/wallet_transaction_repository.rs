use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Row};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::{
    Network, PaymentStatus, TransactionFilter, TransactionStatus, TransactionType,
    WalletTransaction, WalletTransactionCreate, WithdrawDestination,
};

const TX_COLUMNS: &str = r#"
    id, wallet_id, tx_type, status, amount, network, payment_id, payment_status,
    pay_address, pay_amount, pay_currency, destination, description, admin_note,
    processed_by, expires_at, processed_at, created_at, updated_at
"#;

/// 상태 변경 내용 (원장 전이 결과 저장용)
/// Status change produced by a ledger transition
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: TransactionStatus,
    pub payment_status: Option<PaymentStatus>,
    pub admin_note: Option<String>,
    pub processed_by: Option<u64>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// 지갑 거래 Repository
/// Wallet transaction persistence
pub struct WalletTransactionRepository {
    pool: PgPool,
}

impl WalletTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 거래 생성
    /// Insert a transaction (inside or outside a DB transaction)
    pub async fn insert<'e, E>(executor: E, data: &WalletTransactionCreate) -> Result<WalletTransaction>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let destination = data
            .destination
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("Failed to serialize withdraw destination")?;
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO wallet_transactions (
                id, wallet_id, tx_type, status, amount, network, payment_id, payment_status,
                pay_address, pay_amount, pay_currency, destination, description,
                processed_by, expires_at, processed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17)
            RETURNING {}
            "#,
            TX_COLUMNS
        ))
        .bind(data.id as i64)
        .bind(data.wallet_id as i64)
        .bind(data.tx_type.as_str())
        .bind(data.status.as_str())
        .bind(data.amount)
        .bind(data.network.map(|n| n.as_str()))
        .bind(data.payment_id.as_deref())
        .bind(data.payment_status.map(|s| s.as_str()))
        .bind(data.pay_address.as_deref())
        .bind(data.pay_amount)
        .bind(data.pay_currency.as_deref())
        .bind(destination)
        .bind(data.description.as_deref())
        .bind(data.processed_by.map(|id| id as i64))
        .bind(data.expires_at)
        .bind(data.processed_at)
        .bind(now)
        .fetch_one(executor)
        .await
        .context("Failed to insert wallet transaction")?;

        map_transaction(&row)
    }

    /// ID로 거래 조회
    /// Get transaction by ID
    pub async fn get_by_id(&self, id: u64) -> Result<Option<WalletTransaction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallet_transactions WHERE id = $1",
            TX_COLUMNS
        ))
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet transaction")?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// 거래 행 잠금 (ID)
    /// Lock a transaction row by ID
    pub async fn lock_by_id(conn: &mut PgConnection, id: u64) -> Result<Option<WalletTransaction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallet_transactions WHERE id = $1 FOR UPDATE",
            TX_COLUMNS
        ))
        .bind(id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock wallet transaction")?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// 거래 행 잠금 (게이트웨이 결제 ID)
    /// Lock a transaction row by gateway payment ID
    pub async fn lock_by_payment_id(
        conn: &mut PgConnection,
        payment_id: &str,
    ) -> Result<Option<WalletTransaction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM wallet_transactions WHERE payment_id = $1 FOR UPDATE",
            TX_COLUMNS
        ))
        .bind(payment_id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock wallet transaction by payment id")?;

        row.as_ref().map(map_transaction).transpose()
    }

    /// 상태 변경 저장
    /// Persist a status change
    pub async fn update_status(
        conn: &mut PgConnection,
        id: u64,
        update: &StatusUpdate,
    ) -> Result<WalletTransaction> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE wallet_transactions
            SET status = $1,
                payment_status = COALESCE($2, payment_status),
                admin_note = COALESCE($3, admin_note),
                processed_by = COALESCE($4, processed_by),
                processed_at = COALESCE($5, processed_at),
                updated_at = $6
            WHERE id = $7
            RETURNING {}
            "#,
            TX_COLUMNS
        ))
        .bind(update.status.as_str())
        .bind(update.payment_status.map(|s| s.as_str()))
        .bind(update.admin_note.as_deref())
        .bind(update.processed_by.map(|id| id as i64))
        .bind(update.processed_at)
        .bind(Utc::now())
        .bind(id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update wallet transaction status")?;

        map_transaction(&row)
    }

    /// 게이트웨이 상태만 기록 (진행 중)
    /// Record gateway status without changing the ledger status
    pub async fn update_payment_status(
        conn: &mut PgConnection,
        id: u64,
        payment_status: PaymentStatus,
    ) -> Result<WalletTransaction> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE wallet_transactions
            SET payment_status = $1, updated_at = $2
            WHERE id = $3
            RETURNING {}
            "#,
            TX_COLUMNS
        ))
        .bind(payment_status.as_str())
        .bind(Utc::now())
        .bind(id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update payment status")?;

        map_transaction(&row)
    }

    /// 대기 중인 출금 합계
    /// Sum of pending withdrawals for a wallet
    pub async fn sum_pending_withdrawals(conn: &mut PgConnection, wallet_id: u64) -> Result<Decimal> {
        let sum: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount)
            FROM wallet_transactions
            WHERE wallet_id = $1 AND tx_type = 'withdraw' AND status = 'pending'
            "#,
        )
        .bind(wallet_id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to sum pending withdrawals")?;

        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    /// 거래 목록 조회 (wallet_id가 None이면 전체 - 관리자용)
    /// List transactions, optionally scoped to one wallet
    pub async fn list(
        &self,
        wallet_id: Option<u64>,
        filter: &TransactionFilter,
    ) -> Result<Vec<WalletTransaction>> {
        let (limit, offset) = filter.limit_offset();

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM wallet_transactions WHERE TRUE", TX_COLUMNS));

        if let Some(wallet_id) = wallet_id {
            builder.push(" AND wallet_id = ").push_bind(wallet_id as i64);
        }
        if let Some(tx_type) = filter.tx_type {
            builder.push(" AND tx_type = ").push_bind(tx_type.as_str());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list wallet transactions")?;

        rows.iter().map(map_transaction).collect()
    }

    /// 만료 시간이 지난 대기 중 입금 ID 목록
    /// IDs of pending deposits whose deadline has passed
    pub async fn find_expired_pending_deposits(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<u64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM wallet_transactions
            WHERE tx_type = 'deposit' AND status = 'pending' AND expires_at <= $1
            ORDER BY expires_at ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch expired pending deposits")?;

        Ok(ids.into_iter().map(|id| id as u64).collect())
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.get(column);
    value
        .parse::<T>()
        .with_context(|| format!("Invalid value in column '{}'", column))
}

fn parse_optional_column<T>(row: &PgRow, column: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: Option<String> = row.get(column);
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .with_context(|| format!("Invalid value in column '{}'", column))
}

fn map_transaction(row: &PgRow) -> Result<WalletTransaction> {
    let destination: Option<serde_json::Value> = row.get("destination");
    let destination = destination
        .map(serde_json::from_value::<WithdrawDestination>)
        .transpose()
        .context("Invalid withdraw destination")?;

    Ok(WalletTransaction {
        id: row.get::<i64, _>("id") as u64,
        wallet_id: row.get::<i64, _>("wallet_id") as u64,
        tx_type: parse_column::<TransactionType>(row, "tx_type")?,
        status: parse_column::<TransactionStatus>(row, "status")?,
        amount: row.get("amount"),
        network: parse_optional_column::<Network>(row, "network")?,
        payment_id: row.get("payment_id"),
        payment_status: parse_optional_column::<PaymentStatus>(row, "payment_status")?,
        pay_address: row.get("pay_address"),
        pay_amount: row.get("pay_amount"),
        pay_currency: row.get("pay_currency"),
        destination,
        description: row.get("description"),
        admin_note: row.get("admin_note"),
        processed_by: row.get::<Option<i64>, _>("processed_by").map(|id| id as u64),
        expires_at: row.get("expires_at"),
        processed_at: row.get("processed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
