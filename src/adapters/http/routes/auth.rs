use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{CurrentUser, require_auth},
    },
    app_error::AppResult,
};

#[derive(Deserialize)]
struct SignUpPayload {
    email: String,
    name: String,
    password: String,
}

#[derive(Deserialize)]
struct SignInPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RefreshPayload {
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

pub fn router(app_state: AppState) -> Router<AppState> {
    // Sign-out is the one session endpoint that requires a live session.
    let protected = Router::new()
        .route("/sign-out", post(sign_out))
        .route_layer(middleware::from_fn_with_state(app_state, require_auth));

    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/refresh-token", post(refresh_token))
        .merge(protected)
}

async fn sign_up(
    State(app_state): State<AppState>,
    Json(payload): Json<SignUpPayload>,
) -> AppResult<impl IntoResponse> {
    app_state
        .auth_use_cases
        .sign_up(&payload.email, &payload.name, &payload.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

async fn sign_in(
    State(app_state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> AppResult<impl IntoResponse> {
    let pair = app_state
        .auth_use_cases
        .sign_in(&payload.email, &payload.password)
        .await?;
    Ok(Json(pair))
}

async fn refresh_token(
    State(app_state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> AppResult<impl IntoResponse> {
    let pair = app_state
        .auth_use_cases
        .refresh(&payload.refresh_token)
        .await?;
    Ok(Json(pair))
}

async fn sign_out(
    State(app_state): State<AppState>,
    Extension(CurrentUser(profile)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    app_state.auth_use_cases.sign_out(profile.id).await?;
    Ok(StatusCode::OK)
}
