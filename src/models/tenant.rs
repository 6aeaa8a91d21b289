// src/models/tenant.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// A tenant joined with the room number, as listed on the tenants screen.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TenantWithRoom {
    pub id: Uuid,
    pub property_id: String,
    pub room_id: Uuid,
    pub name: String,
    pub wa_number: Option<String>,
    pub move_in_date: NaiveDate,
    pub deposit_amount: i64,
    pub is_active: bool,
    pub move_out_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub room_no: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantPayload {
    pub room_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Nama wajib diisi (maks 100)"))]
    pub name: String,
    #[validate(length(max = 20, message = "Nomor WA maksimal 20 karakter"))]
    pub wa_number: Option<String>,
    pub move_in_date: NaiveDate,
    #[validate(range(min = 0, message = "Deposit tidak boleh negatif"))]
    #[serde(default)]
    pub deposit_amount: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTenantPayload {
    pub room_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Nama wajib diisi (maks 100)"))]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "Nomor WA maksimal 20 karakter"))]
    pub wa_number: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Deposit tidak boleh negatif"))]
    pub deposit_amount: Option<i64>,
    pub is_active: Option<bool>,
}

impl UpdateTenantPayload {
    pub fn is_empty(&self) -> bool {
        self.room_id.is_none()
            && self.name.is_none()
            && self.wa_number.is_none()
            && self.move_in_date.is_none()
            && self.deposit_amount.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedTenant {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub move_in_date: NaiveDate,
    pub deposit_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // An all-None patch must be caught before it reaches the query builder,
    // which cannot render an UPDATE with zero assignments.
    #[test]
    fn empty_update_is_detected() {
        let payload: UpdateTenantPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.is_empty());

        let payload: UpdateTenantPayload =
            serde_json::from_str("{\"name\": \"Budi\"}").unwrap();
        assert!(!payload.is_empty());

        let payload: UpdateTenantPayload =
            serde_json::from_str("{\"is_active\": false}").unwrap();
        assert!(!payload.is_empty());
    }
}
