use chrono::{DateTime, Utc};

/// Refresh Token 모델 (DB 저장용, 원본이 아닌 sha256 해시만 저장)
/// Refresh Token model (only the sha256 hash is stored)
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: u64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// 사용 가능 여부 (무효화/만료 확인)
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Refresh Token 생성 요청 (새 토큰 발급 시)
/// Refresh Token creation request
#[derive(Debug)]
pub struct RefreshTokenCreate {
    pub user_id: u64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
