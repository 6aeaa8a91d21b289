// src/models/room.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// A room plus its active tenant (if any), as listed on the rooms screen.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct RoomWithTenant {
    pub id: Uuid,
    pub property_id: String,
    pub room_no: i32,
    pub monthly_rate: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub tenant_id: Option<Uuid>,
    pub tenant_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomPayload {
    #[validate(range(min = 1, max = 99, message = "Nomor kamar harus 1-99"))]
    pub room_no: i32,
    #[validate(range(min = 0, message = "Tarif tidak boleh negatif"))]
    pub monthly_rate: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomPayload {
    #[validate(range(min = 0, message = "Tarif tidak boleh negatif"))]
    pub monthly_rate: Option<i64>,
    pub is_active: Option<bool>,
}

/// Settings bulk update: one rate applied to every room of the property.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkRatePayload {
    #[validate(range(min = 1, message = "monthly_rate harus bilangan positif"))]
    pub monthly_rate: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedRoom {
    pub id: Uuid,
    pub room_no: i32,
    pub monthly_rate: i64,
}
