use axum::{
    Extension, Json, Router, middleware, response::IntoResponse, routing::get,
};
use serde_json::json;

use crate::adapters::http::{
    app_state::AppState,
    middleware::{CurrentUser, require_auth},
};

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_private_data))
        .route_layer(middleware::from_fn_with_state(app_state, require_auth))
}

/// Sample protected endpoint: only reachable through the auth gate, which
/// has already attached the resolved identity.
async fn get_private_data(Extension(CurrentUser(profile)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({ "message": format!("Hello, {}", profile.name) }))
}
