use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::auth::models::{User, UserRole};

const USER_COLUMNS: &str = "id, email, password_hash, username, role, created_at, updated_at";

/// 사용자 Repository
/// User persistence
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 사용자 생성 (역할은 DB 기본값 user)
    /// Create user with a snowflake id
    pub async fn create_user(
        &self,
        id: u64,
        email: &str,
        password_hash: &str,
        username: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id as i64)
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create user")?;

        map_user(&row)
    }

    // 이메일로 사용자 조회 (로그인용)
    // Get user by email (for login)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        row.as_ref().map(map_user).transpose()
    }

    // ID로 사용자 조회
    // Get user by ID
    pub async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        row.as_ref().map(map_user).transpose()
    }

    /// 역할 변경 (관리자 지정)
    /// Change a user's role
    pub async fn set_role(&self, id: u64, role: UserRole) -> Result<()> {
        sqlx::query("UPDATE users SET role = $1, updated_at = $2 WHERE id = $3")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id as i64)
            .execute(&self.pool)
            .await
            .context("Failed to update user role")?;

        Ok(())
    }
}

fn map_user(row: &PgRow) -> Result<User> {
    let role: String = row.get("role");

    Ok(User {
        id: row.get::<i64, _>("id") as u64,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        username: row.get("username"),
        role: UserRole::parse(&role).with_context(|| format!("Unknown user role '{}'", role))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
