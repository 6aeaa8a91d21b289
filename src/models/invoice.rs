// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pay_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayMethod {
    Transfer,
    Cash,
    Other,
}

// An invoice row as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Invoice {
    pub id: Uuid,
    pub property_id: String,
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub period: String,
    pub invoice_no: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Invoice joined with tenant + room for the period listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct InvoiceWithTenant {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub period: String,
    pub invoice_no: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub tenant_name: String,
    pub move_in_date: NaiveDate,
    pub room_no: i32,
}

/// An active tenant with the room's current monthly rate, as fetched for
/// invoice generation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillableTenant {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub room_no: i32,
    pub monthly_rate: i64,
}

/// One invoice the generator decided to create. The amount is the room rate
/// at planning time; later rate changes do not touch it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlannedInvoice {
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub room_id: Uuid,
    pub invoice_no: String,
    pub tenant_name: String,
    pub room_no: i32,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateInvoicesResponse {
    pub period: String,
    pub created_count: usize,
    pub invoices: Vec<CreatedInvoice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedInvoice {
    pub id: Uuid,
    pub invoice_no: String,
    pub tenant_name: String,
    pub room_no: i32,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceListResponse {
    pub period: String,
    pub invoices: Vec<InvoiceWithTenant>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentPayload {
    pub invoice_id: Uuid,
    #[validate(range(min = 1, message = "Jumlah harus bilangan positif"))]
    pub amount: i64,
    pub method: PayMethod,
    pub proof_key: Option<String>,
    #[validate(length(max = 500, message = "Catatan maksimal 500 karakter"))]
    pub notes: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    pub status: InvoiceStatus,
    pub paid_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
