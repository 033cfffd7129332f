use crate::shared::database::{Database, UserRepository, RefreshTokenRepository};
use crate::shared::utils::SnowflakeGenerator;
use crate::domains::auth::models::{User, SignupRequest, SigninRequest, RefreshTokenCreate};
use crate::domains::auth::services::JwtService;
use crate::shared::errors::AuthError;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use chrono::{Duration, Utc};

fn db_err(context: &str, e: anyhow::Error) -> AuthError {
    AuthError::DatabaseError(format!("{}: {:#}", context, e))
}

// 인증 서비스
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt_service: JwtService,
    ids: SnowflakeGenerator,
    refresh_token_days: i64,
}

impl AuthService {
    pub fn new(
        db: Database,
        jwt_service: JwtService,
        ids: SnowflakeGenerator,
        refresh_token_days: i64,
    ) -> Self {
        Self {
            db,
            jwt_service,
            ids,
            refresh_token_days,
        }
    }

    // 회원가입
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        request.validate()?;

        let user_repo = UserRepository::new(self.db.pool().clone());
        let email = request.email.trim().to_lowercase();

        // 1. 이메일 중복 확인
        let existing_user = user_repo
            .get_user_by_email(&email)
            .await
            .map_err(|e| db_err("Failed to check email existence", e))?;

        if existing_user.is_some() {
            return Err(AuthError::EmailAlreadyExists { email });
        }

        // 2. 비밀번호 해싱
        let password_hash = Self::hash_password(&request.password)?;

        // 3. 사용자 생성 (Snowflake ID, 기본 역할 user)
        let user = user_repo
            .create_user(
                self.ids.next_id(),
                &email,
                &password_hash,
                request.username.as_deref(),
            )
            .await
            .map_err(|e| db_err("Failed to create user", e))?;

        tracing::info!(user_id = user.id, "user signed up");
        Ok(user)
    }

    // 로그인
    // Returns: (User, access_token, refresh_token)
    pub async fn signin(&self, request: SigninRequest) -> Result<(User, String, String), AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        // 1. 이메일로 사용자 조회
        let user = user_repo
            .get_user_by_email(&request.email.trim().to_lowercase())
            .await
            .map_err(|e| db_err("Failed to fetch user", e))?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        Self::verify_password(&request.password, &user.password_hash)?;

        // 3. 이전 Refresh Token 무효화 (새 로그인 시 기존 세션 종료)
        let refresh_token_repo = RefreshTokenRepository::new(self.db.pool().clone());
        refresh_token_repo
            .revoke_all_for_user(user.id)
            .await
            .map_err(|e| db_err("Failed to revoke previous tokens", e))?;

        // 4. 토큰 발급
        let access_token = self.jwt_service.generate_access_token(&user)?;
        let refresh_token = self.create_refresh_token(user.id).await?;

        tracing::info!(user_id = user.id, "user signed in");
        Ok((user, access_token, refresh_token))
    }

    /// Refresh Token 생성 및 DB 저장
    /// Create and store refresh token
    async fn create_refresh_token(&self, user_id: u64) -> Result<String, AuthError> {
        let refresh_token_repo = RefreshTokenRepository::new(self.db.pool().clone());

        let refresh_token = self.jwt_service.generate_refresh_token();
        let token_hash = self.jwt_service.hash_refresh_token(&refresh_token);

        refresh_token_repo
            .create(RefreshTokenCreate {
                user_id,
                token_hash,
                expires_at: Utc::now() + Duration::days(self.refresh_token_days),
            })
            .await
            .map_err(|e| db_err("Failed to create refresh token", e))?;

        // 원본 토큰 반환 (해싱 전)
        Ok(refresh_token)
    }

    /// Refresh Token 검증 후 새 토큰 쌍 발급 (rotation)
    /// Verify refresh token and issue a new token pair
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, String), AuthError> {
        let refresh_token_repo = RefreshTokenRepository::new(self.db.pool().clone());
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token);

        // 1. 저장된 토큰 확인
        let stored_token = refresh_token_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| db_err("Failed to find refresh token", e))?
            .ok_or(AuthError::InvalidToken)?;

        if !stored_token.is_usable(Utc::now()) {
            return Err(AuthError::InvalidToken);
        }

        // 2. 사용자 조회
        let user_repo = UserRepository::new(self.db.pool().clone());
        let user = user_repo
            .get_user_by_id(stored_token.user_id)
            .await
            .map_err(|e| db_err("Failed to fetch user", e))?
            .ok_or(AuthError::InvalidToken)?;

        // 3. 기존 토큰 무효화 후 새 토큰 발급
        refresh_token_repo
            .revoke(&token_hash)
            .await
            .map_err(|e| db_err("Failed to revoke old refresh token", e))?;

        let access_token = self.jwt_service.generate_access_token(&user)?;
        let new_refresh_token = self.create_refresh_token(user.id).await?;

        Ok((access_token, new_refresh_token))
    }

    /// 로그아웃 - Refresh Token 무효화
    /// Logout - Revoke refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let refresh_token_repo = RefreshTokenRepository::new(self.db.pool().clone());
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token);

        refresh_token_repo
            .revoke(&token_hash)
            .await
            .map_err(|e| db_err("Failed to revoke refresh token", e))
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        let user_repo = UserRepository::new(self.db.pool().clone());

        user_repo
            .get_user_by_id(user_id)
            .await
            .map_err(|e| db_err("Failed to fetch user", e))?
            .ok_or(AuthError::UserNotFound { id: user_id })
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::PasswordVerificationFailed(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}
