use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::user::UserProfile;
use secrecy::ExposeSecret;

/// Signed claims: the public-safe user representation plus expiry.
/// The password hash and stored tokens never enter a token.
///
/// `jti` makes every issued token distinct. Timestamps alone are
/// second-resolution, and rotation relies on the new pair differing from
/// the old one: validation compares token strings against the stored pair,
/// so two identical issuances would leave the superseded pair live.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Sign a token for `profile` with the given secret and lifetime. The same
/// function serves both token classes; callers pick the secret and TTL.
pub fn issue(
    profile: &UserProfile,
    secret: &secrecy::SecretString,
    ttl: Duration,
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let exp = now + ttl.whole_seconds();
    let claims = Claims {
        sub: profile.id.to_string(),
        email: profile.email.clone(),
        name: profile.name.clone(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp,
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Check signature and expiry against `secret` and return the claims.
/// Expiry is reported separately from other failures so clients can tell
/// "re-authenticate" apart from a bad token; both map to the same 401 class.
pub fn verify(token: &str, secret: &secrecy::SecretString) -> AppResult<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
        _ => AppError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use uuid::Uuid;

    fn test_profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            name: "Test User".to_string(),
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let profile = test_profile();
        let key = secret("access-secret");

        let token = issue(&profile, &key, Duration::minutes(15)).unwrap();
        let claims = verify(&token, &key).unwrap();

        assert_eq!(claims.sub, profile.id.to_string());
        assert_eq!(claims.email, profile.email);
        assert_eq!(claims.name, profile.name);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn back_to_back_issuance_produces_distinct_tokens() {
        let profile = test_profile();
        let key = secret("access-secret");

        // Same user, same secret, same TTL, (almost certainly) the same
        // second. Rotation depends on these not colliding.
        let first = issue(&profile, &key, Duration::minutes(15)).unwrap();
        let second = issue(&profile, &key, Duration::minutes(15)).unwrap();

        assert_ne!(first, second);
        let a = verify(&first, &key).unwrap();
        let b = verify(&second, &key).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let profile = test_profile();
        let token = issue(&profile, &secret("access-secret"), Duration::minutes(15)).unwrap();

        let result = verify(&token, &secret("refresh-secret"));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_expired_token_as_expired() {
        let profile = test_profile();
        let key = secret("access-secret");

        // Well past the default 60s validation leeway.
        let token = issue(&profile, &key, Duration::seconds(-300)).unwrap();

        let result = verify(&token, &key);
        assert!(matches!(result, Err(AppError::ExpiredToken)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let result = verify("not-a-jwt", &secret("access-secret"));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
