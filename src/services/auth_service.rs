use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    auth::JwtService,
    errors::{AppError, AppResult},
    models::domain::refresh_token::{hash_token, RefreshToken},
    models::dto::request::{LoginRequest, RegisterRequest},
    models::dto::response::{AuthResponse, RefreshTokenResponse},
    repositories::RefreshTokenRepository,
    services::user_service::UserService,
};

pub struct AuthService {
    users: Arc<UserService>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let user = self.users.register(request).await?;
        self.issue_tokens(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = self
            .users
            .authenticate(&request.email, &request.password)
            .await?;
        self.issue_tokens(user).await
    }

    /// Rotates the refresh token: the presented one is revoked and a fresh
    /// pair is issued. A token missing from the store is treated as revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let stored = self
            .refresh_tokens
            .find_by_token_hash(&hash_token(refresh_token))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Refresh token not recognized".to_string()))?;

        if !stored.is_valid() {
            return Err(AppError::Unauthorized(
                "Refresh token has been revoked or expired".to_string(),
            ));
        }

        let user = self
            .users
            .get_user_for_token(&claims.sub)
            .await
            .map_err(|_| {
                AppError::Unauthorized("User associated with refresh token not found".to_string())
            })?;

        self.refresh_tokens
            .revoke_by_token_hash(&stored.token_hash)
            .await?;

        let token = self.jwt.create_token(&user)?;
        let new_refresh_token = self.persist_refresh_token(&claims.sub).await?;

        log::info!("Token refreshed for user {}", claims.sub);

        Ok(RefreshTokenResponse {
            token,
            refresh_token: new_refresh_token,
        })
    }

    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        self.refresh_tokens
            .revoke_by_token_hash(&hash_token(refresh_token))
            .await
    }

    /// Revokes every outstanding refresh token for the user; called when an
    /// account is deleted.
    pub async fn revoke_all_sessions(&self, user_id: &str) -> AppResult<u64> {
        self.refresh_tokens.revoke_all_for_user(user_id).await
    }

    /// Startup housekeeping: clears tokens past their expiry.
    pub async fn purge_expired_tokens(&self) -> AppResult<u64> {
        let removed = self.refresh_tokens.delete_expired().await?;
        if removed > 0 {
            log::info!("Purged {} expired refresh tokens", removed);
        }
        Ok(removed)
    }

    async fn issue_tokens(&self, user: crate::models::domain::User) -> AppResult<AuthResponse> {
        let user_id = user
            .id_hex()
            .ok_or_else(|| AppError::InternalError("User has no id after save".to_string()))?;

        let token = self.jwt.create_token(&user)?;
        let refresh_token = self.persist_refresh_token(&user_id).await?;

        Ok(AuthResponse {
            token,
            refresh_token,
            user: user.into(),
        })
    }

    async fn persist_refresh_token(&self, user_id: &str) -> AppResult<String> {
        let refresh_token = self.jwt.create_refresh_token(user_id)?;
        let expires_at = Utc::now() + Duration::hours(self.jwt.refresh_expiration_hours());

        self.refresh_tokens
            .create(RefreshToken::new(
                user_id.to_string(),
                hash_token(&refresh_token),
                expires_at,
            ))
            .await?;

        Ok(refresh_token)
    }
}
