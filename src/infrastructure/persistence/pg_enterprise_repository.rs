//! PostgreSQL implementation of enterprise repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{Enterprise, NewEnterprise, UpdateEnterprise};
use crate::domain::repositories::EnterpriseRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct EnterpriseRow {
    id: i64,
    name: String,
    description: Option<String>,
    is_primary_producer: bool,
    is_distributor: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnterpriseRow> for Enterprise {
    fn from(r: EnterpriseRow) -> Self {
        Enterprise {
            id: r.id,
            name: r.name,
            description: r.description,
            is_primary_producer: r.is_primary_producer,
            is_distributor: r.is_distributor,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for enterprises.
///
/// Bulk updates run inside a single transaction.
pub struct PgEnterpriseRepository {
    pool: Arc<PgPool>,
}

impl PgEnterpriseRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn update_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        update: UpdateEnterprise,
    ) -> Result<Enterprise, AppError> {
        let row = sqlx::query_as::<_, EnterpriseRow>(
            r#"
            UPDATE enterprises SET
                name                = COALESCE($2::TEXT, name),
                description         = CASE WHEN $3 THEN $4::TEXT ELSE description END,
                is_primary_producer = COALESCE($5::BOOLEAN, is_primary_producer),
                is_distributor      = COALESCE($6::BOOLEAN, is_distributor),
                is_active           = COALESCE($7::BOOLEAN, is_active),
                updated_at          = NOW()
            WHERE id = $1
            RETURNING id, name, description, is_primary_producer, is_distributor, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.description.is_some())
        .bind(update.description.flatten())
        .bind(update.is_primary_producer)
        .bind(update.is_distributor)
        .bind(update.is_active)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Enterprise not found", json!({"id": id})))
    }
}

#[async_trait]
impl EnterpriseRepository for PgEnterpriseRepository {
    async fn create(&self, new_enterprise: NewEnterprise) -> Result<Enterprise, AppError> {
        let row = sqlx::query_as::<_, EnterpriseRow>(
            r#"
            INSERT INTO enterprises (name, description, is_primary_producer, is_distributor)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, is_primary_producer, is_distributor, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(new_enterprise.name)
        .bind(new_enterprise.description)
        .bind(new_enterprise.is_primary_producer)
        .bind(new_enterprise.is_distributor)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Enterprise>, AppError> {
        let row = sqlx::query_as::<_, EnterpriseRow>(
            r#"
            SELECT id, name, description, is_primary_producer, is_distributor, is_active,
                   created_at, updated_at
            FROM enterprises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Enterprise>, AppError> {
        let row = sqlx::query_as::<_, EnterpriseRow>(
            r#"
            SELECT id, name, description, is_primary_producer, is_distributor, is_active,
                   created_at, updated_at
            FROM enterprises
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Enterprise>, AppError> {
        let rows = sqlx::query_as::<_, EnterpriseRow>(
            r#"
            SELECT id, name, description, is_primary_producer, is_distributor, is_active,
                   created_at, updated_at
            FROM enterprises
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: UpdateEnterprise) -> Result<Enterprise, AppError> {
        let mut tx = self.pool.begin().await?;
        let enterprise = Self::update_in_tx(&mut tx, id, update).await?;
        tx.commit().await?;
        Ok(enterprise)
    }

    async fn update_many(
        &self,
        updates: Vec<(i64, UpdateEnterprise)>,
    ) -> Result<Vec<Enterprise>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(updates.len());

        for (id, update) in updates {
            match Self::update_in_tx(&mut tx, id, update).await {
                Ok(enterprise) => updated.push(enterprise),
                Err(e) => {
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM enterprises WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Enterprise not found",
                json!({"id": id}),
            ));
        }

        Ok(())
    }
}
