//! PostgreSQL implementation of distributor repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Distributor, NewDistributor, UpdateDistributor};
use crate::domain::repositories::DistributorRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DistributorRow {
    id: i64,
    name: String,
    description: Option<String>,
    email: Option<String>,
    pickup_address: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DistributorRow> for Distributor {
    fn from(r: DistributorRow) -> Self {
        Distributor {
            id: r.id,
            name: r.name,
            description: r.description,
            email: r.email,
            pickup_address: r.pickup_address,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for distributors.
pub struct PgDistributorRepository {
    pool: Arc<PgPool>,
}

impl PgDistributorRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributorRepository for PgDistributorRepository {
    async fn create(&self, new_distributor: NewDistributor) -> Result<Distributor, AppError> {
        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            INSERT INTO distributors (name, description, email, pickup_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, email, pickup_address, is_active, created_at, updated_at
            "#,
        )
        .bind(new_distributor.name)
        .bind(new_distributor.description)
        .bind(new_distributor.email)
        .bind(new_distributor.pickup_address)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Distributor>, AppError> {
        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            SELECT id, name, description, email, pickup_address, is_active, created_at, updated_at
            FROM distributors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Distributor>, AppError> {
        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            SELECT id, name, description, email, pickup_address, is_active, created_at, updated_at
            FROM distributors
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, only_active: bool) -> Result<Vec<Distributor>, AppError> {
        let rows = sqlx::query_as::<_, DistributorRow>(
            r#"
            SELECT id, name, description, email, pickup_address, is_active, created_at, updated_at
            FROM distributors
            WHERE ($1::boolean IS NULL OR is_active = $1)
            ORDER BY name
            "#,
        )
        .bind(if only_active { Some(true) } else { None })
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: UpdateDistributor) -> Result<Distributor, AppError> {
        let row = sqlx::query_as::<_, DistributorRow>(
            r#"
            UPDATE distributors SET
                name           = COALESCE($2::TEXT, name),
                description    = CASE WHEN $3 THEN $4::TEXT ELSE description END,
                email          = CASE WHEN $5 THEN $6::TEXT ELSE email END,
                pickup_address = CASE WHEN $7 THEN $8::TEXT ELSE pickup_address END,
                is_active      = COALESCE($9::BOOLEAN, is_active),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING id, name, description, email, pickup_address, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.description.is_some())
        .bind(update.description.flatten())
        .bind(update.email.is_some())
        .bind(update.email.flatten())
        .bind(update.pickup_address.is_some())
        .bind(update.pickup_address.flatten())
        .bind(update.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Distributor not found", json!({"id": id})))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM distributors WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Distributor not found",
                json!({"id": id}),
            ));
        }

        Ok(())
    }

    async fn set_active_many(&self, ids: Vec<i64>, is_active: bool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE distributors SET is_active = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(is_active)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_orders(&self, id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE distributor_id = $1")
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
