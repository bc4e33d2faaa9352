//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::Product;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::StockAdjustment;
use crate::services::product::{CreateProductInput, UpdateProductInput};
use crate::services::{InventoryService, ProductService};
use crate::AppState;

#[derive(Serialize)]
pub struct StockResponse {
    pub product_id: Uuid,
    pub stock: i32,
    pub min_stock: i32,
    pub under_stocked: bool,
}

#[derive(Deserialize)]
pub struct AdjustStockRequest {
    pub stock: i32,
}

/// Create a product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list().await?;
    Ok(Json(products))
}

/// Get a product by id
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Update a product's catalog fields (admin or sales)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    current_user.0.require_inventory_manager()?;
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product and its movements (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    current_user.0.require_admin()?;
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Get a product's current stock level and threshold status
pub async fn get_product_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<StockResponse>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(StockResponse {
        product_id: product.id,
        stock: product.stock,
        min_stock: product.min_stock,
        under_stocked: product.is_under_stocked(),
    }))
}

/// Set a product's stock to an absolute value (admin or sales)
///
/// Issues a synthetic adjustment movement rather than writing the column
/// directly, so the ledger stays authoritative.
pub async fn adjust_product_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(body): Json<AdjustStockRequest>,
) -> AppResult<Json<StockAdjustment>> {
    current_user.0.require_inventory_manager()?;
    let service = InventoryService::new(state.db);
    let adjustment = service.adjust_stock(product_id, body.stock).await?;
    Ok(Json(adjustment))
}
