use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use time::Duration;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{jwt, password, validators::is_valid_email},
    domain::entities::user::{User, UserProfile},
};

/// Persistence port for user records. All token-pair mutation goes through
/// `store_token_pair`/`clear_token_pair`, each a single atomic save.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<User>>;
    async fn store_token_pair(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<()>;
    async fn clear_token_pair(&self, user_id: Uuid) -> AppResult<()>;
}

/// Signing configuration, injected at construction. Access and refresh
/// tokens use independent secrets so compromise of one class cannot forge
/// the other.
pub struct TokenSettings {
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    tokens: TokenSettings,
}

impl AuthUseCases {
    pub fn new(repo: Arc<dyn UserRepo>, tokens: TokenSettings) -> Self {
        Self { repo, tokens }
    }

    /// Create a user with a freshly hashed password. No tokens are issued
    /// here; the client signs in separately.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, name: &str, password: &str) -> AppResult<()> {
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput("Email is invalid".into()));
        }
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("Name is required".into()));
        }
        if password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }

        let password_hash = password::hash(password)?;
        self.repo.create(email, name, &password_hash).await?;
        Ok(())
    }

    /// Verify credentials and issue a fresh token pair. Unknown email and
    /// wrong password collapse into one failure so callers cannot probe
    /// which accounts exist.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !password::verify(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }
        self.issue_token_pair(&user).await
    }

    /// Rotate the token pair for the holder of `refresh_token`. The token
    /// must both carry a valid signature/expiry under the refresh secret
    /// and match the stored current refresh token; a superseded token fails
    /// the second check even when it is still unexpired.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        jwt::verify(refresh_token, &self.tokens.refresh_secret)
            .map_err(|_| AppError::InvalidRefreshToken)?;

        let Some(user) = self.repo.find_by_refresh_token(refresh_token).await? else {
            return Err(AppError::InvalidRefreshToken);
        };
        self.issue_token_pair(&user).await
    }

    /// Revoke the current pair. There is no blacklist: clearing the stored
    /// tokens is what makes every outstanding token fail the gate.
    #[instrument(skip(self))]
    pub async fn sign_out(&self, user_id: Uuid) -> AppResult<()> {
        self.repo.clear_token_pair(user_id).await
    }

    /// The per-request authentication gate. Takes the raw `Authorization`
    /// header value and walks: header shape -> signature/expiry -> identity
    /// lookup -> byte-for-byte match against the stored access token. Any
    /// rejection is terminal for the request; clients re-authenticate via
    /// sign-in or refresh.
    #[instrument(skip(self, authorization))]
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<UserProfile> {
        let token = authorization
            .and_then(|header| header.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingBearerToken)?;

        let claims = jwt::verify(token, &self.tokens.access_secret)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        let Some(user) = self.repo.find_by_id(user_id).await? else {
            return Err(AppError::UserNotFound);
        };

        // Signature validity is not enough: the token must be the user's
        // current one. A mismatch means it was rotated away or revoked.
        if user.access_token.as_deref() != Some(token) {
            return Err(AppError::StaleToken);
        }

        Ok(UserProfile::from(&user))
    }

    /// The rotation point. Signs both tokens for the user's public profile
    /// and persists them as the single current pair in one save, replacing
    /// whatever pair existed before.
    async fn issue_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        let profile = UserProfile::from(user);
        let access_token = jwt::issue(&profile, &self.tokens.access_secret, self.tokens.access_ttl)?;
        let refresh_token = jwt::issue(
            &profile,
            &self.tokens.refresh_secret,
            self.tokens.refresh_ttl,
        )?;

        self.repo
            .store_token_pair(user.id, &access_token, &refresh_token)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
