//! PostgreSQL implementation of product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::entities::{NewProduct, Product};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    supplier_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DistributionRow {
    product_id: i64,
    distributor_id: i64,
}

impl ProductRow {
    fn into_product(self, distributor_ids: BTreeSet<i64>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            supplier_id: self.supplier_id,
            distributor_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL repository for products.
///
/// Availability is stored in `product_distributions` and loaded with a
/// second query per call, keyed by product id.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn attach_distributors(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, DistributionRow>(
            "SELECT product_id, distributor_id FROM product_distributions WHERE product_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_product: HashMap<i64, BTreeSet<i64>> = HashMap::new();
        for link in links {
            by_product
                .entry(link.product_id)
                .or_default()
                .insert(link.distributor_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let distributor_ids = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(distributor_ids)
            })
            .collect())
    }

    async fn fetch_one_optional(&self, row: Option<ProductRow>) -> Result<Option<Product>, AppError> {
        match row {
            Some(row) => Ok(self.attach_distributors(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, description, supplier_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, supplier_id, created_at, updated_at
            "#,
        )
        .bind(new_product.name)
        .bind(new_product.description)
        .bind(new_product.supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        let distributor_ids: Vec<i64> = new_product.distributor_ids.iter().copied().collect();
        sqlx::query(
            r#"
            INSERT INTO product_distributions (product_id, distributor_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(row.id)
        .bind(distributor_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_product(new_product.distributor_ids))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, supplier_id, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        self.fetch_one_optional(row).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, supplier_id, created_at, updated_at
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        self.fetch_one_optional(row).await
    }

    async fn find_many(&self, ids: Vec<i64>) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, supplier_id, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        self.attach_distributors(rows).await
    }

    async fn list(&self, distributor_id: Option<i64>) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.name, p.description, p.supplier_id, p.created_at, p.updated_at
            FROM products p
            WHERE $1::BIGINT IS NULL
               OR EXISTS (
                   SELECT 1 FROM product_distributions pd
                   WHERE pd.product_id = p.id AND pd.distributor_id = $1
               )
            ORDER BY p.name
            "#,
        )
        .bind(distributor_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        self.attach_distributors(rows).await
    }

    async fn set_distributors(
        &self,
        id: i64,
        distributor_ids: BTreeSet<i64>,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products SET updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, supplier_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(AppError::not_found("Product not found", json!({"id": id})));
        };

        let ids: Vec<i64> = distributor_ids.iter().copied().collect();

        let stranded: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT o.distributor_id
            FROM line_items li
            JOIN orders o ON o.id = li.order_id
            WHERE li.product_id = $1
              AND o.distributor_id IS NOT NULL
              AND o.distributor_id <> ALL($2::BIGINT[])
            ORDER BY o.distributor_id
            "#,
        )
        .bind(id)
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;

        if !stranded.is_empty() {
            tx.rollback().await?;
            return Err(AppError::conflict(
                "Carts still hold this product through a distributor being removed",
                json!({ "product_id": id, "distributor_ids": stranded }),
            ));
        }

        sqlx::query("DELETE FROM product_distributions WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO product_distributions (product_id, distributor_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(id)
        .bind(ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into_product(distributor_ids))
    }
}
