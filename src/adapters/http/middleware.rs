use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{adapters::http::app_state::AppState, app_error::AppError, domain::entities::user::UserProfile};

/// The authenticated identity, attached to the request extensions by
/// `require_auth` for downstream handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// Gate for protected routes. Runs the full authentication check (bearer
/// header, signature/expiry, identity lookup, stored-token match) and
/// short-circuits with 401 before the handler when any step rejects.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let profile = app_state.auth_use_cases.authenticate(authorization).await?;

    request.extensions_mut().insert(CurrentUser(profile));

    Ok(next.run(request).await)
}
