//! HTTP handlers for inventory movements and the shortfall registry

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::{InventoryEntry, InventoryExit};
use shared::types::{PaginatedResponse, Pagination};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    InventoryReport, RecordEntryInput, RecordExitInput, ShortfallView,
};
use crate::services::InventoryService;
use crate::AppState;

/// Record stock received (admin or sales)
pub async fn record_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordEntryInput>,
) -> AppResult<(StatusCode, Json<InventoryEntry>)> {
    current_user.0.require_inventory_manager()?;
    let service = InventoryService::new(state.db);
    let entry = service.record_entry(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Record stock sold (admin or sales)
pub async fn record_exit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordExitInput>,
) -> AppResult<(StatusCode, Json<InventoryExit>)> {
    current_user.0.require_inventory_manager()?;
    let service = InventoryService::new(state.db);
    let exit = service.record_exit(input).await?;
    Ok((StatusCode::CREATED, Json(exit)))
}

/// List entries, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    pagination: Option<Query<Pagination>>,
) -> AppResult<Json<PaginatedResponse<InventoryEntry>>> {
    let pagination = pagination.map(|Query(p)| p).unwrap_or_default();
    let service = InventoryService::new(state.db);
    let entries = service.list_entries(pagination).await?;
    Ok(Json(entries))
}

/// List exits, newest first
pub async fn list_exits(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    pagination: Option<Query<Pagination>>,
) -> AppResult<Json<PaginatedResponse<InventoryExit>>> {
    let pagination = pagination.map(|Query(p)| p).unwrap_or_default();
    let service = InventoryService::new(state.db);
    let exits = service.list_exits(pagination).await?;
    Ok(Json(exits))
}

/// Delete an entry, reversing its stock effect (admin or sales)
pub async fn delete_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    current_user.0.require_inventory_manager()?;
    let service = InventoryService::new(state.db);
    service.delete_entry(entry_id).await?;
    Ok(Json(json!({ "message": "Inventory entry deleted" })))
}

/// Delete an exit, restoring its quantity to stock (admin or sales)
pub async fn delete_exit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(exit_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    current_user.0.require_inventory_manager()?;
    let service = InventoryService::new(state.db);
    service.delete_exit(exit_id).await?;
    Ok(Json(json!({ "message": "Inventory exit deleted" })))
}

/// List products currently below their minimum stock threshold
pub async fn list_shortfalls(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ShortfallView>>> {
    let service = InventoryService::new(state.db);
    let shortfalls = service.list_shortfalls().await?;
    Ok(Json(shortfalls))
}

/// Aggregate inventory report for dashboards
pub async fn get_inventory_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<InventoryReport>> {
    let service = InventoryService::new(state.db);
    let report = service.get_report().await?;
    Ok(Json(report))
}
