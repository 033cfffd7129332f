use crate::shared::errors::AuthError;
use crate::domains::auth::models::{Claims, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Refresh Token 길이 (문자)
const REFRESH_TOKEN_LEN: usize = 64;

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_hours: i64,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, access_token_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_hours,
        }
    }

    /// Access Token 발급 (짧은 수명)
    /// Generate Access Token (short lifetime)
    pub fn generate_access_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user.id, user.email.clone(), user.role, self.access_token_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Refresh Token 생성 (랜덤 문자열, 해시만 DB에 저장)
    /// Generate Refresh Token (random string)
    pub fn generate_refresh_token(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Access Token 검증 (만료 포함)
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
