use std::sync::Arc;

use crate::{infra::config::AppConfig, use_cases::auth::AuthUseCases};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
}
