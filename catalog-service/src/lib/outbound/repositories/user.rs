use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw user row; validated into domain types on the way out.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: Option<String>,
    password_hash: String,
    is_active: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_domain(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            username: Username::new(self.username)?,
            email: self.email.map(EmailAddress::new).transpose()?,
            password_hash: self.password_hash,
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, is_active, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, is_active, is_superuser, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("users_username_key")
                {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        row.try_into_domain()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, is_active, is_superuser, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_domain).transpose()
    }
}
