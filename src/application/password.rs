use crate::app_error::{AppError, AppResult};

/// Hash a plaintext password with a random salt. Called only where a
/// password value is being set, never on unrelated saves.
pub fn hash(plaintext: &str) -> AppResult<String> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))
}

/// Compare a plaintext password against a stored hash. A wrong password and
/// an unparseable hash both come back `false`; this never errors.
pub fn verify(plaintext: &str, hashed: &str) -> bool {
    bcrypt::verify(plaintext, hashed).unwrap_or(false)
}
