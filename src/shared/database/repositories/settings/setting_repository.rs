use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::settings::models::{Setting, SettingValueType};

/// 설정 Repository (configs 테이블)
/// Key/value settings persistence
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 키로 조회
    /// Get setting by key
    pub async fn get(&self, key: &str) -> Result<Option<Setting>> {
        let row = sqlx::query(
            r#"
            SELECT key, value, value_type, description, updated_at
            FROM configs
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch setting")?;

        row.as_ref().map(map_setting).transpose()
    }

    /// 전체 조회
    /// List all settings
    pub async fn list(&self) -> Result<Vec<Setting>> {
        let rows = sqlx::query(
            r#"
            SELECT key, value, value_type, description, updated_at
            FROM configs
            ORDER BY key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list settings")?;

        rows.iter().map(map_setting).collect()
    }

    /// 생성 또는 수정
    /// Insert or update a setting
    pub async fn upsert(
        &self,
        key: &str,
        value: &str,
        value_type: SettingValueType,
        description: Option<&str>,
    ) -> Result<Setting> {
        let row = sqlx::query(
            r#"
            INSERT INTO configs (key, value, value_type, description, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                value_type = EXCLUDED.value_type,
                description = COALESCE(EXCLUDED.description, configs.description),
                updated_at = EXCLUDED.updated_at
            RETURNING key, value, value_type, description, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(value_type.as_str())
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert setting")?;

        map_setting(&row)
    }
}

fn map_setting(row: &PgRow) -> Result<Setting> {
    let value_type: String = row.get("value_type");

    Ok(Setting {
        key: row.get("key"),
        value: row.get("value"),
        value_type: SettingValueType::parse(&value_type)
            .with_context(|| format!("Unknown setting value type '{}'", value_type))?,
        description: row.get("description"),
        updated_at: row.get("updated_at"),
    })
}
