use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::user::User,
    use_cases::auth::UserRepo,
};

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
struct UserDb {
    id: Uuid,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
    email: String,
    name: String,
    password_hash: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl From<UserDb> for User {
    fn from(rec: UserDb) -> Self {
        User {
            id: rec.id,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
            email: rec.email,
            name: rec.name,
            password_hash: rec.password_hash,
            access_token: rec.access_token,
            refresh_token: rec.refresh_token,
        }
    }
}

const USER_COLUMNS: &str =
    "id, created_at, updated_at, email, name, password_hash, access_token, refresh_token";

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(&self, email: &str, name: &str, password_hash: &str) -> AppResult<User> {
        let id = Uuid::new_v4();
        let rec = sqlx::query_as::<_, UserDb>(&format!(
            "INSERT INTO users (id, email, name, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.into())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rec = sqlx::query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(User::from))
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let rec = sqlx::query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(User::from))
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<User>> {
        let rec = sqlx::query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE refresh_token = $1"
        ))
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rec.map(User::from))
    }

    // One UPDATE, so the pair is replaced atomically. Concurrent rotations
    // for the same user are last-write-wins; the losing pair simply fails
    // the stored-match check on its next use.
    async fn store_token_pair(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET access_token = $2, refresh_token = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn clear_token_pair(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET access_token = NULL, refresh_token = NULL, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }
}
