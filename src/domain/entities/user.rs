use chrono::NaiveDateTime;
use uuid::Uuid;

/// The persisted user record. `access_token`/`refresh_token` hold the single
/// live pair for this user; both are `None` when signed out.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Public-safe projection of a user: what goes into token claims and onto
/// the request context. Never carries the password hash or stored tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
