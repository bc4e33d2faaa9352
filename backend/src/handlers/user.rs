//! HTTP handlers for user administration and profiles

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::{User, UserRole};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::user::{AdminUpdateUserInput, UpdateProfileInput};
use crate::services::UserService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Get the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get(current_user.0.user_id).await?;
    Ok(Json(user))
}

/// Update the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.update_profile(current_user.0.user_id, input).await?;
    Ok(Json(user))
}

/// List all users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    let users = service.list().await?;
    Ok(Json(users))
}

/// Get a user by id (admin)
pub async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    let user = service.get(user_id).await?;
    Ok(Json(user))
}

/// Edit another account (admin)
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(input): Json<AdminUpdateUserInput>,
) -> AppResult<Json<User>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    let user = service.admin_update(user_id, input).await?;
    Ok(Json(user))
}

/// Change a user's role (admin)
pub async fn change_user_role(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ChangeRoleRequest>,
) -> AppResult<Json<User>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    let user = service.change_role(user_id, body.role).await?;
    Ok(Json(user))
}

/// Activate or deactivate an account (admin)
pub async fn set_user_active(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetActiveRequest>,
) -> AppResult<Json<User>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    let user = service.set_active(user_id, body.is_active).await?;
    Ok(Json(user))
}

/// Delete an account (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    current_user.0.require_admin()?;
    let service = UserService::new(state.db);
    service.delete(user_id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
