//! Product catalog service
//!
//! Catalog writes never touch `stock` directly (that column belongs to the
//! stock reconciler), but creating a product with an initial stock level or
//! changing `min_stock` can change its shortfall status, so both paths
//! refresh the registry inside their own transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::Product;
use shared::validation::{validate_min_stock, validate_price, validate_product_name};

use crate::error::{AppError, AppResult};
use crate::services::inventory::refresh_shortfall;

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    /// Operator-supplied opening stock; the accounting invariant holds
    /// relative to this baseline
    #[serde(default)]
    pub stock: i32,
    pub min_stock: i32,
    pub price: Decimal,
}

/// Input for updating a product (stock is excluded by design)
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub min_stock: Option<i32>,
    pub price: Option<Decimal>,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    stock: i32,
    min_stock: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            stock: row.stock,
            min_stock: row.min_stock,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        Self::validate_fields(&input.name, input.min_stock, input.price)?;
        if input.stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Opening stock cannot be negative".to_string(),
                message_es: "El stock inicial no puede ser negativo".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, description, stock, min_stock, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, stock, min_stock, price, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await?;

        // A product can be born under-stocked
        refresh_shortfall(&mut *tx, product.id, product.stock, product.min_stock).await?;
        tx.commit().await?;

        Ok(product.into())
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, stock, min_stock, price, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product.into())
    }

    /// List all products
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, stock, min_stock, price, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Update catalog fields of a product
    ///
    /// Takes the product row lock so a `min_stock` change cannot interleave
    /// with a concurrent movement's reconciliation.
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, stock, min_stock, price, created_at, updated_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.unwrap_or(existing.description);
        let min_stock = input.min_stock.unwrap_or(existing.min_stock);
        let price = input.price.unwrap_or(existing.price);

        Self::validate_fields(&name, min_stock, price)?;

        let product = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, description = $2, min_stock = $3, price = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, description, stock, min_stock, price, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(min_stock)
        .bind(price)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        // min_stock may have moved across the current stock level
        refresh_shortfall(&mut *tx, product.id, product.stock, product.min_stock).await?;
        tx.commit().await?;

        Ok(product.into())
    }

    /// Delete a product
    ///
    /// Movements and any shortfall record cascade with the product.
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    fn validate_fields(name: &str, min_stock: i32, price: Decimal) -> AppResult<()> {
        validate_product_name(name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_es: "El nombre del producto debe tener entre 1 y 100 caracteres".to_string(),
        })?;
        validate_min_stock(min_stock).map_err(|msg| AppError::Validation {
            field: "min_stock".to_string(),
            message: msg.to_string(),
            message_es: "El stock mínimo no puede ser negativo".to_string(),
        })?;
        validate_price(price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
            message_es: "El precio no puede ser negativo".to_string(),
        })?;
        Ok(())
    }
}
