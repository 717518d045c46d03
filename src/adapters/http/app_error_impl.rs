use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, None)
            }
            AppError::DuplicateEmail => {
                error_resp(StatusCode::CONFLICT, ErrorCode::DuplicateEmail, None)
            }
            AppError::InvalidCredentials => {
                error_resp(StatusCode::FORBIDDEN, ErrorCode::InvalidCredentials, None)
            }
            AppError::MissingBearerToken => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorCode::MissingBearerToken,
                None,
            ),
            AppError::ExpiredToken => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::TokenExpired, None)
            }
            AppError::InvalidToken => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::TokenInvalid, None)
            }
            AppError::UserNotFound => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::UserNotFound, None)
            }
            AppError::StaleToken => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::TokenStale, None)
            }
            AppError::InvalidRefreshToken => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidRefreshToken, None)
            }
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, Some(msg))
            }
            AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
