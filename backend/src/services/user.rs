//! User administration service
//!
//! Profile self-service plus the admin-only operations: listing accounts,
//! editing them, changing roles, toggling activation and deletion.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{User, UserRole};
use shared::validation::{validate_email, validate_username};

use crate::error::{AppError, AppResult};
use crate::services::auth::UserRow;

/// User administration service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Input for a user editing their own profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}

/// Input for an admin editing another account
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

const SELECT_USER: &str = r#"
SELECT id, email, username, first_name, last_name, address, role,
       password_hash, is_active, created_at, updated_at
FROM users
"#;

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a user by id
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    /// List all user accounts
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY username", SELECT_USER))
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Update the authenticated user's own profile
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> AppResult<User> {
        let existing = self.get(user_id).await?;

        let username = input.username.unwrap_or(existing.username);
        let first_name = input.first_name.unwrap_or(existing.first_name);
        let last_name = input.last_name.unwrap_or(existing.last_name);
        let address = input.address.unwrap_or(existing.address);

        validate_username(&username).map_err(|msg| AppError::Validation {
            field: "username".to_string(),
            message: msg.to_string(),
            message_es: "El nombre de usuario debe tener entre 1 y 150 caracteres".to_string(),
        })?;

        self.ensure_username_free(&username, user_id).await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $1, first_name = $2, last_name = $3, address = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, email, username, first_name, last_name, address, role,
                      password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&username)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&address)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        row.into_user()
    }

    /// Admin edit of another account: username, email and role
    pub async fn admin_update(
        &self,
        user_id: Uuid,
        input: AdminUpdateUserInput,
    ) -> AppResult<User> {
        let existing = self.get(user_id).await?;

        let username = input.username.unwrap_or(existing.username);
        let email = input.email.unwrap_or(existing.email);
        let role = input.role.unwrap_or(existing.role);

        validate_username(&username).map_err(|msg| AppError::Validation {
            field: "username".to_string(),
            message: msg.to_string(),
            message_es: "El nombre de usuario debe tener entre 1 y 150 caracteres".to_string(),
        })?;
        validate_email(&email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
            message_es: "El formato del correo electrónico no es válido".to_string(),
        })?;

        self.ensure_username_free(&username, user_id).await?;
        self.ensure_email_free(&email, user_id).await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $1, email = $2, role = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, email, username, first_name, last_name, address, role,
                      password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&username)
        .bind(&email)
        .bind(role.as_str())
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        row.into_user()
    }

    /// Change a user's role
    pub async fn change_role(&self, user_id: Uuid, role: UserRole) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, email, username, first_name, last_name, address, role,
                      password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(role.as_str())
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET is_active = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, email, username, first_name, last_name, address, role,
                      password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(is_active)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_user()
    }

    /// Delete an account
    pub async fn delete(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    async fn ensure_username_free(&self, username: &str, user_id: Uuid) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
        )
        .bind(username)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, user_id: Uuid) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }
        Ok(())
    }
}
