// src/db/tenant_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenant::{CreateTenantPayload, TenantWithRoom, UpdateTenantPayload},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_room(&self, property_id: &str) -> Result<Vec<TenantWithRoom>, AppError> {
        let tenants = sqlx::query_as::<_, TenantWithRoom>(
            r#"
            SELECT t.id, t.property_id, t.room_id, t.name, t.wa_number, t.move_in_date,
                   t.deposit_amount, t.is_active, t.move_out_date, t.created_at, r.room_no
            FROM tenants t
            JOIN rooms r ON r.id = t.room_id
            WHERE t.property_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    pub async fn create(
        &self,
        property_id: &str,
        input: &CreateTenantPayload,
    ) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO tenants (property_id, room_id, name, wa_number, move_in_date, deposit_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(property_id)
        .bind(input.room_id)
        .bind(&input.name)
        .bind(&input.wa_number)
        .bind(input.move_in_date)
        .bind(input.deposit_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // One active tenant per room.
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::conflict("Kamar sudah ditempati penghuni aktif")
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::not_found("Kamar tidak ditemukan")
            }
            other => AppError::from(other),
        })?;
        Ok(id)
    }

    pub async fn update(&self, id: Uuid, input: &UpdateTenantPayload) -> Result<u64, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tenants SET ");
        let mut sets = qb.separated(", ");
        if let Some(room_id) = input.room_id {
            sets.push("room_id = ");
            sets.push_bind_unseparated(room_id);
        }
        if let Some(ref name) = input.name {
            sets.push("name = ");
            sets.push_bind_unseparated(name.clone());
        }
        if let Some(ref wa) = input.wa_number {
            sets.push("wa_number = ");
            sets.push_bind_unseparated(wa.clone());
        }
        if let Some(date) = input.move_in_date {
            sets.push("move_in_date = ");
            sets.push_bind_unseparated(date);
        }
        if let Some(deposit) = input.deposit_amount {
            sets.push("deposit_amount = ");
            sets.push_bind_unseparated(deposit);
        }
        if let Some(active) = input.is_active {
            sets.push("is_active = ");
            sets.push_bind_unseparated(active);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Move-out: deactivates the tenant and stamps the move-out date, which
    /// also vacates the room for the partial unique index.
    pub async fn deactivate(&self, id: Uuid, move_out_date: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE tenants SET is_active = FALSE, move_out_date = $1 WHERE id = $2",
        )
        .bind(move_out_date)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let found: Option<Uuid> = sqlx::query_scalar("SELECT id FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
