//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::models::{User, UserRole};
use shared::validation::validate_password;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Claims;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new user account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    pub address: String,
    pub password: String,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub tokens: AuthTokens,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User row from database
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_user(self) -> AppResult<User> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("unknown role in database: {}", self.role)))?;
        Ok(User {
            id: self.id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new user account
    ///
    /// New accounts get the consultant (read-only) role; an admin can
    /// promote them afterwards.
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        validate_password(&input.password).map_err(|msg| AppError::Validation {
            field: "password".to_string(),
            message: msg.to_string(),
            message_es: "La contraseña debe tener al menos 8 caracteres".to_string(),
        })?;

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if email_taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let username_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(&input.username)
        .fetch_one(&self.db)
        .await?;

        if username_taken {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

        let role = UserRole::default();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, username, first_name, last_name, address, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, username, first_name, last_name, address, role,
                      password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.username)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.address)
        .bind(role.as_str())
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        let tokens = self.generate_tokens(row.id, role)?;
        let user = row.into_user()?;

        Ok(RegisterResponse { user, tokens })
    }

    /// Authenticate with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, first_name, last_name, address, role,
                   password_hash, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        if !row.is_active {
            return Err(AppError::AccountDisabled);
        }

        let user = row.into_user()?;
        self.generate_tokens(user.id, user.role)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let claims = self.decode_token(refresh_token)?;

        if claims.token_use != "refresh" {
            return Err(AppError::InvalidToken);
        }

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        // Re-read the account so a deactivated user cannot keep refreshing
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, first_name, last_name, address, role,
                   password_hash, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        if !row.is_active {
            return Err(AppError::AccountDisabled);
        }

        let user = row.into_user()?;
        self.generate_tokens(user.id, user.role)
    }

    /// Issue an access/refresh token pair for a user
    pub fn generate_tokens(&self, user_id: Uuid, role: UserRole) -> AppResult<AuthTokens> {
        let now = Utc::now();

        let access_claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            token_use: "access".to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let refresh_claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            token_use: "refresh".to_string(),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}
