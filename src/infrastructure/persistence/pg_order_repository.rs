//! PostgreSQL implementation of order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::admission::AdmissionError;
use crate::domain::entities::{LineItem, Order};
use crate::domain::repositories::OrderRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    token: String,
    distributor_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: i64,
    product_id: i64,
    quantity: i32,
}

impl TryFrom<LineItemRow> for LineItem {
    type Error = AppError;

    fn try_from(r: LineItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(r.quantity).map_err(|_| {
            AppError::internal(
                "Stored line item has a negative quantity",
                json!({"line_item_id": r.id}),
            )
        })?;

        Ok(LineItem {
            id: Some(r.id),
            product_id: r.product_id,
            quantity,
        })
    }
}

/// PostgreSQL repository for carts.
///
/// [`OrderRepository::save`] runs in one transaction: a new order is inserted
/// together with its line items, and a stored order is locked so the
/// distributor check and the inserts cannot interleave with another request
/// on the same cart. Any error drops the transaction, rolling everything back.
pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn load(
        tx: &mut Transaction<'_, Postgres>,
        row: OrderRow,
    ) -> Result<Order, AppError> {
        let items = sqlx::query_as::<_, LineItemRow>(
            "SELECT id, product_id, quantity FROM line_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(&mut **tx)
        .await?;

        let line_items = items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Order {
            id: row.id,
            token: row.token,
            distributor_id: row.distributor_id,
            line_items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Writes the distributor of a stored order, with the row locked.
    ///
    /// Refuses to change the distributor once the stored order has items.
    /// Locks the product row against concurrent distributor changes and
    /// confirms it is still carried by the order's distributor.
    async fn check_available(
        tx: &mut Transaction<'_, Postgres>,
        product_id: i64,
        distributor_id: Option<i64>,
    ) -> Result<(), AppError> {
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1 FOR SHARE")
            .bind(product_id)
            .fetch_optional(&mut **tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::not_found(
                "Product not found",
                json!({"id": product_id}),
            ));
        }

        let distributor_id = distributor_id.ok_or(AdmissionError::NoDistributor)?;
        let available: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM product_distributions
                WHERE product_id = $1 AND distributor_id = $2
            )
            "#,
        )
        .bind(product_id)
        .bind(distributor_id)
        .fetch_one(&mut **tx)
        .await?;

        if available {
            Ok(())
        } else {
            Err(AdmissionError::ProductNotAtDistributor {
                product_id,
                distributor_id,
            }
            .into())
        }
    }

    async fn rebind(tx: &mut Transaction<'_, Postgres>, order: &Order) -> Result<(), AppError> {
        let stored = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, token, distributor_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(order.id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found", json!({"id": order.id})))?;

        let has_items: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM line_items WHERE order_id = $1)")
                .bind(order.id)
                .fetch_one(&mut **tx)
                .await?;

        if has_items && stored.distributor_id != order.distributor_id {
            return Err(match (stored.distributor_id, order.distributor_id) {
                (Some(current), Some(requested)) => AdmissionError::DistributorMismatch {
                    order_distributor: current,
                    requested,
                }
                .into(),
                _ => AdmissionError::CartNotEmpty.into(),
            });
        }

        sqlx::query("UPDATE orders SET distributor_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(order.id)
            .bind(order.distributor_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Order>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, token, distributor_id, created_at, updated_at FROM orders WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let order = match row {
            Some(row) => Some(Self::load(&mut tx, row).await?),
            None => None,
        };

        tx.commit().await?;
        Ok(order)
    }

    async fn save(&self, order: &Order) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order_id = if order.is_stored() {
            Self::rebind(&mut tx, order).await?;
            order.id
        } else {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO orders (token, distributor_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(&order.token)
            .bind(order.distributor_id)
            .fetch_one(&mut *tx)
            .await?
        };

        for item in order.unsaved_line_items() {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                AppError::bad_request(
                    "Quantity is too large",
                    json!({"product_id": item.product_id}),
                )
            })?;
            Self::check_available(&mut tx, item.product_id, order.distributor_id).await?;

            sqlx::query("INSERT INTO line_items (order_id, product_id, quantity) VALUES ($1, $2, $3)")
                .bind(order_id)
                .bind(item.product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, token, distributor_id, created_at, updated_at FROM orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;
        let saved = Self::load(&mut tx, row).await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn clear(&self, order_id: i64) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM line_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders SET distributor_id = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING id, token, distributor_id, created_at, updated_at
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(AppError::not_found("Order not found", json!({"id": order_id})));
        };

        tx.commit().await?;

        Ok(Order {
            id: row.id,
            token: row.token,
            distributor_id: row.distributor_id,
            line_items: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
