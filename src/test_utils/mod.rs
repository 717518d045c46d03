//! Test utilities: an in-memory `UserRepo`, a user factory, and an
//! `AppState` builder wired with fixed signing settings, for HTTP-level
//! testing of the routers without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;
use time::Duration;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::password,
    domain::entities::user::User,
    infra::config::AppConfig,
    use_cases::auth::{AuthUseCases, TokenSettings, UserRepo},
};

/// In-memory implementation of `UserRepo`, enforcing the same email
/// uniqueness the database constraint does.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }

    /// Direct (non-trait) lookup for assertions on stored state.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let now = chrono::Utc::now().naive_utc();
        let user = User {
            id: Uuid::new_v4(),
            created_at: Some(now),
            updated_at: Some(now),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            access_token: None,
            refresh_token: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn store_token_pair(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(&user_id) {
            user.access_token = Some(access_token.to_string());
            user.refresh_token = Some(refresh_token.to_string());
            user.updated_at = Some(chrono::Utc::now().naive_utc());
        }
        Ok(())
    }

    async fn clear_token_pair(&self, user_id: Uuid) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(&user_id) {
            user.access_token = None;
            user.refresh_token = None;
            user.updated_at = Some(chrono::Utc::now().naive_utc());
        }
        Ok(())
    }
}

/// Create a test user with sensible defaults. The password is "password1".
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let now = chrono::Utc::now().naive_utc();
    let mut user = User {
        id: Uuid::new_v4(),
        created_at: Some(now),
        updated_at: Some(now),
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        password_hash: password::hash("password1").unwrap(),
        access_token: None,
        refresh_token: None,
    };
    overrides(&mut user);
    user
}

/// Fixed signing settings so tests can mint tokens that match what the
/// use cases issue.
pub fn test_token_settings() -> TokenSettings {
    TokenSettings {
        access_secret: SecretString::from("test-access-secret".to_string()),
        refresh_secret: SecretString::from("test-refresh-secret".to_string()),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(30),
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        cors_origin: axum::http::HeaderValue::from_static("http://localhost:3000"),
        access_token_secret: SecretString::from("test-access-secret".to_string()),
        refresh_token_secret: SecretString::from("test-refresh-secret".to_string()),
        access_token_ttl: Duration::minutes(15),
        refresh_token_ttl: Duration::days(30),
    }
}

/// `AppState` over the in-memory repo with the fixed test settings.
pub fn test_app_state(repo: Arc<InMemoryUserRepo>) -> AppState {
    let auth_use_cases = AuthUseCases::new(repo as Arc<dyn UserRepo>, test_token_settings());
    AppState {
        config: Arc::new(test_config()),
        auth_use_cases: Arc::new(auth_use_cases),
    }
}
