// src/db/room_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::room::{RoomWithTenant, UpdateRoomPayload},
};

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Rooms with their active tenant (at most one by schema constraint).
    pub async fn list_with_tenant(
        &self,
        property_id: &str,
    ) -> Result<Vec<RoomWithTenant>, AppError> {
        let rooms = sqlx::query_as::<_, RoomWithTenant>(
            r#"
            SELECT r.id, r.property_id, r.room_no, r.monthly_rate, r.is_active, r.created_at,
                   t.id AS tenant_id, t.name AS tenant_name
            FROM rooms r
            LEFT JOIN tenants t ON t.room_id = r.id AND t.is_active
            WHERE r.property_id = $1
            ORDER BY r.room_no
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn create(
        &self,
        property_id: &str,
        room_no: i32,
        monthly_rate: i64,
    ) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO rooms (property_id, room_no, monthly_rate)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(property_id)
        .bind(room_no)
        .bind(monthly_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::conflict("Nomor kamar sudah dipakai")
            }
            other => AppError::from(other),
        })?;
        Ok(id)
    }

    pub async fn update(&self, id: Uuid, input: &UpdateRoomPayload) -> Result<u64, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE rooms SET ");
        let mut sets = qb.separated(", ");
        if let Some(rate) = input.monthly_rate {
            sets.push("monthly_rate = ");
            sets.push_bind_unseparated(rate);
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

    /// Settings bulk update: one rate for every room of the property.
    pub async fn bulk_rate(&self, property_id: &str, rate: i64) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE rooms SET monthly_rate = $1 WHERE property_id = $2")
            .bind(rate)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
