pub mod auth;
pub mod health_check;
pub mod private_data;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health-check", health_check::router())
        .nest("/auth", auth::router(app_state.clone()))
        .nest("/private-data", private_data::router(app_state))
}
