//! Inventory service: the movement ledger and the stock reconciler
//!
//! This service is the sole writer of `products.stock` and of the
//! insufficient-stock registry. Every movement create or delete runs in a
//! single database transaction: the product row is locked, the ledger row is
//! written or removed, the stock delta is applied, and the shortfall registry
//! is refreshed. If any step fails the whole operation rolls back, so a
//! movement row never exists without its stock effect.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{shortfall_needed, InventoryEntry, InventoryExit, MovementKind};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};

/// Inventory service for recording movements and reading shortfalls
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for recording an inventory entry
#[derive(Debug, Deserialize)]
pub struct RecordEntryInput {
    pub product_id: Uuid,
    pub quantity_received: i32,
}

/// Input for recording an inventory exit
#[derive(Debug, Deserialize)]
pub struct RecordExitInput {
    pub product_id: Uuid,
    pub quantity_sold: i32,
}

/// A shortfall record joined with its product name, for dashboards
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShortfallView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_needed: i32,
    pub updated_at: DateTime<Utc>,
}

/// Result of a direct stock adjustment
///
/// Adjustments are expressed as synthetic movements so they participate in
/// the same reconciliation path as ordinary entries and exits.
#[derive(Debug, Clone, Serialize)]
pub struct StockAdjustment {
    pub product_id: Uuid,
    pub previous_stock: i32,
    pub new_stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_kind: Option<MovementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_id: Option<Uuid>,
}

/// Aggregated inventory report for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub entries: Vec<EntryReportLine>,
    pub exits: Vec<ExitReportLine>,
    pub shortfalls: Vec<ShortfallView>,
    pub sales: Vec<ProductSales>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EntryReportLine {
    pub product_name: String,
    pub quantity_received: i32,
    pub date_received: NaiveDate,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExitReportLine {
    pub product_name: String,
    pub quantity_sold: i32,
    pub date_sold: NaiveDate,
}

/// Units sold and revenue per product
#[derive(Debug, Clone, Serialize)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_sold: i64,
    pub price: Decimal,
    pub revenue: Decimal,
}

/// Row for the movement tables
#[derive(Debug, FromRow)]
struct EntryRow {
    id: Uuid,
    product_id: Uuid,
    quantity_received: i32,
    date_received: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for InventoryEntry {
    fn from(row: EntryRow) -> Self {
        InventoryEntry {
            id: row.id,
            product_id: row.product_id,
            quantity_received: row.quantity_received,
            date_received: row.date_received,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ExitRow {
    id: Uuid,
    product_id: Uuid,
    quantity_sold: i32,
    date_sold: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<ExitRow> for InventoryExit {
    fn from(row: ExitRow) -> Self {
        InventoryExit {
            id: row.id,
            product_id: row.product_id,
            quantity_sold: row.quantity_sold,
            date_sold: row.date_sold,
            created_at: row.created_at,
        }
    }
}

/// Product fields held under the row lock during reconciliation
#[derive(Debug, FromRow)]
struct ProductLock {
    id: Uuid,
    stock: i32,
    min_stock: i32,
}

/// Row for the sales summary query
#[derive(Debug, FromRow)]
struct SalesRow {
    product_id: Uuid,
    product_name: String,
    quantity_sold: i64,
    price: Decimal,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record stock received for a product
    ///
    /// Validates the quantity, appends the ledger row and applies the
    /// positive stock delta atomically.
    pub async fn record_entry(&self, input: RecordEntryInput) -> AppResult<InventoryEntry> {
        validate_quantity(input.quantity_received).map_err(|msg| AppError::Validation {
            field: "quantity_received".to_string(),
            message: msg.to_string(),
            message_es: "La cantidad debe ser positiva".to_string(),
        })?;

        let mut tx = self.db.begin().await?;
        let product = Self::lock_product(&mut tx, input.product_id).await?;

        let entry = sqlx::query_as::<_, EntryRow>(
            r#"
            INSERT INTO inventory_entries (product_id, quantity_received, date_received)
            VALUES ($1, $2, CURRENT_DATE)
            RETURNING id, product_id, quantity_received, date_received, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity_received)
        .fetch_one(&mut *tx)
        .await?;

        Self::apply_delta(&mut tx, &product, input.quantity_received).await?;
        tx.commit().await?;

        Ok(entry.into())
    }

    /// Record stock sold for a product
    ///
    /// Rejects the exit with `InsufficientStock` when the quantity exceeds
    /// the current stock; the check runs under the product row lock, before
    /// anything is persisted, so overselling can never be committed.
    pub async fn record_exit(&self, input: RecordExitInput) -> AppResult<InventoryExit> {
        validate_quantity(input.quantity_sold).map_err(|msg| AppError::Validation {
            field: "quantity_sold".to_string(),
            message: msg.to_string(),
            message_es: "La cantidad debe ser positiva".to_string(),
        })?;

        let mut tx = self.db.begin().await?;
        let product = Self::lock_product(&mut tx, input.product_id).await?;

        if input.quantity_sold > product.stock {
            return Err(AppError::InsufficientStock(format!(
                "requested {}, available {}",
                input.quantity_sold, product.stock
            )));
        }

        let exit = sqlx::query_as::<_, ExitRow>(
            r#"
            INSERT INTO inventory_exits (product_id, quantity_sold, date_sold)
            VALUES ($1, $2, CURRENT_DATE)
            RETURNING id, product_id, quantity_sold, date_sold, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity_sold)
        .fetch_one(&mut *tx)
        .await?;

        Self::apply_delta(&mut tx, &product, -input.quantity_sold).await?;
        tx.commit().await?;

        Ok(exit.into())
    }

    /// Delete an entry and reverse its stock effect
    ///
    /// Deletion is an unconditional reversal: it is never rejected for
    /// driving stock negative, which can happen when an entry is removed
    /// after exits already consumed its quantity.
    pub async fn delete_entry(&self, entry_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let entry = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, product_id, quantity_received, date_received, created_at
            FROM inventory_entries
            WHERE id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory entry".to_string()))?;

        let product = Self::lock_product(&mut tx, entry.product_id).await?;

        let deleted = sqlx::query("DELETE FROM inventory_entries WHERE id = $1")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            // A concurrent delete won the race after our read
            return Err(AppError::NotFound("Inventory entry".to_string()));
        }

        Self::apply_delta(&mut tx, &product, -entry.quantity_received).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Delete an exit and add its quantity back to stock
    pub async fn delete_exit(&self, exit_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exit = sqlx::query_as::<_, ExitRow>(
            r#"
            SELECT id, product_id, quantity_sold, date_sold, created_at
            FROM inventory_exits
            WHERE id = $1
            "#,
        )
        .bind(exit_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory exit".to_string()))?;

        let product = Self::lock_product(&mut tx, exit.product_id).await?;

        let deleted = sqlx::query("DELETE FROM inventory_exits WHERE id = $1")
            .bind(exit_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory exit".to_string()));
        }

        Self::apply_delta(&mut tx, &product, exit.quantity_sold).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Set a product's stock to an absolute value through the ledger
    ///
    /// The legacy direct stock edit is re-expressed as a synthetic movement:
    /// an entry when adjusting upward, an exit when adjusting downward. The
    /// movement flows through the normal reconciliation, so the accounting
    /// invariant and the shortfall registry stay consistent.
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        new_stock: i32,
    ) -> AppResult<StockAdjustment> {
        if new_stock < 0 {
            return Err(AppError::Validation {
                field: "stock".to_string(),
                message: "Stock cannot be adjusted below zero".to_string(),
                message_es: "El stock no puede ajustarse por debajo de cero".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let product = Self::lock_product(&mut tx, product_id).await?;
        let delta = new_stock - product.stock;

        let (movement_kind, movement_id) = if delta > 0 {
            let id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO inventory_entries (product_id, quantity_received, date_received)
                VALUES ($1, $2, CURRENT_DATE)
                RETURNING id
                "#,
            )
            .bind(product_id)
            .bind(delta)
            .fetch_one(&mut *tx)
            .await?;
            (Some(MovementKind::Entry), Some(id))
        } else if delta < 0 {
            let id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO inventory_exits (product_id, quantity_sold, date_sold)
                VALUES ($1, $2, CURRENT_DATE)
                RETURNING id
                "#,
            )
            .bind(product_id)
            .bind(-delta)
            .fetch_one(&mut *tx)
            .await?;
            (Some(MovementKind::Exit), Some(id))
        } else {
            (None, None)
        };

        if delta != 0 {
            Self::apply_delta(&mut tx, &product, delta).await?;
        }
        tx.commit().await?;

        Ok(StockAdjustment {
            product_id,
            previous_stock: product.stock,
            new_stock,
            movement_kind,
            movement_id,
        })
    }

    /// List entries, newest first
    pub async fn list_entries(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<InventoryEntry>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_entries")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, product_id, quantity_received, date_received, created_at
            FROM inventory_entries
            ORDER BY date_received DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// List exits, newest first
    pub async fn list_exits(
        &self,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<InventoryExit>> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_exits")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, ExitRow>(
            r#"
            SELECT id, product_id, quantity_sold, date_sold, created_at
            FROM inventory_exits
            ORDER BY date_sold DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    /// List all products currently below their minimum stock threshold
    ///
    /// The listing reflects the state as of the last committed
    /// reconciliation; there is no independent write path into the registry.
    pub async fn list_shortfalls(&self) -> AppResult<Vec<ShortfallView>> {
        let shortfalls = sqlx::query_as::<_, ShortfallView>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name, s.quantity_needed, s.updated_at
            FROM insufficient_stock s
            JOIN products p ON p.id = s.product_id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(shortfalls)
    }

    /// Aggregate inventory report: movements, shortfalls and sales revenue
    pub async fn get_report(&self) -> AppResult<InventoryReport> {
        let entries = sqlx::query_as::<_, EntryReportLine>(
            r#"
            SELECT p.name AS product_name, e.quantity_received, e.date_received
            FROM inventory_entries e
            JOIN products p ON p.id = e.product_id
            ORDER BY e.date_received DESC, e.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let exits = sqlx::query_as::<_, ExitReportLine>(
            r#"
            SELECT p.name AS product_name, x.quantity_sold, x.date_sold
            FROM inventory_exits x
            JOIN products p ON p.id = x.product_id
            ORDER BY x.date_sold DESC, x.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let shortfalls = self.list_shortfalls().await?;

        let sales_rows = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name,
                   COALESCE(SUM(x.quantity_sold), 0) AS quantity_sold,
                   p.price
            FROM products p
            LEFT JOIN inventory_exits x ON x.product_id = p.id
            GROUP BY p.id, p.name, p.price
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        // Revenue in Decimal to avoid float drift
        let sales = sales_rows
            .into_iter()
            .map(|r| ProductSales {
                product_id: r.product_id,
                product_name: r.product_name,
                quantity_sold: r.quantity_sold,
                price: r.price,
                revenue: Decimal::from(r.quantity_sold) * r.price,
            })
            .collect();

        Ok(InventoryReport {
            entries,
            exits,
            shortfalls,
            sales,
        })
    }

    /// Lock the product row for the duration of the transaction
    ///
    /// The row lock serializes concurrent movements against the same
    /// product, so the read-modify-write of `stock` never loses an update.
    /// Movements against different products proceed in parallel.
    async fn lock_product(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
    ) -> AppResult<ProductLock> {
        sqlx::query_as::<_, ProductLock>(
            "SELECT id, stock, min_stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Apply a signed stock delta and refresh the shortfall registry
    ///
    /// Caller must hold the product row lock. Runs entirely inside the
    /// caller's transaction.
    async fn apply_delta(
        tx: &mut Transaction<'_, Postgres>,
        product: &ProductLock,
        delta: i32,
    ) -> AppResult<i32> {
        let new_stock = product.stock.checked_add(delta).ok_or_else(|| {
            AppError::Reconciliation(format!("stock overflow for product {}", product.id))
        })?;

        let updated = sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(product.id)
            .execute(&mut **tx)
            .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::Reconciliation(format!(
                "product {} vanished while locked",
                product.id
            )));
        }

        refresh_shortfall(&mut **tx, product.id, new_stock, product.min_stock).await?;

        Ok(new_stock)
    }
}

/// Upsert or delete the shortfall record for a product
///
/// Shared with the product service: any write that changes `stock` or
/// `min_stock` must re-evaluate the threshold inside its own transaction.
pub(crate) async fn refresh_shortfall(
    conn: &mut PgConnection,
    product_id: Uuid,
    stock: i32,
    min_stock: i32,
) -> AppResult<()> {
    match shortfall_needed(stock, min_stock) {
        Some(needed) => {
            sqlx::query(
                r#"
                INSERT INTO insufficient_stock (product_id, quantity_needed)
                VALUES ($1, $2)
                ON CONFLICT (product_id)
                DO UPDATE SET quantity_needed = EXCLUDED.quantity_needed, updated_at = NOW()
                "#,
            )
            .bind(product_id)
            .bind(needed)
            .execute(&mut *conn)
            .await?;
        }
        None => {
            sqlx::query("DELETE FROM insufficient_stock WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(())
}
