//! PostgreSQL implementation of supplier repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewSupplier, Supplier, UpdateSupplier};
use crate::domain::repositories::SupplierRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: i64,
    name: String,
    description: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(r: SupplierRow) -> Self {
        Supplier {
            id: r.id,
            name: r.name,
            description: r.description,
            email: r.email,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for suppliers.
pub struct PgSupplierRepository {
    pool: Arc<PgPool>,
}

impl PgSupplierRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierRepository for PgSupplierRepository {
    async fn create(&self, new_supplier: NewSupplier) -> Result<Supplier, AppError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, description, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, email, created_at, updated_at
            "#,
        )
        .bind(new_supplier.name)
        .bind(new_supplier.description)
        .bind(new_supplier.email)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Supplier>, AppError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, description, email, created_at, updated_at FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Supplier>, AppError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, description, email, created_at, updated_at FROM suppliers WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, description, email, created_at, updated_at FROM suppliers ORDER BY name",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: UpdateSupplier) -> Result<Supplier, AppError> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers SET
                name        = COALESCE($2::TEXT, name),
                description = CASE WHEN $3 THEN $4::TEXT ELSE description END,
                email       = CASE WHEN $5 THEN $6::TEXT ELSE email END,
                updated_at  = NOW()
            WHERE id = $1
            RETURNING id, name, description, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.description.is_some())
        .bind(update.description.flatten())
        .bind(update.email.is_some())
        .bind(update.email.flatten())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Supplier not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Supplier not found", json!({"id": id})));
        }

        Ok(())
    }
}
