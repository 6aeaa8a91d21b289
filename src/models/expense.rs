// src/models/expense.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::invoice::PayMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Draft,
    Confirmed,
}

/// The expenses table doubles as the cash ledger: operational inflows are
/// rows of type `income`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cashflow_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CashflowType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Listrik,
    Air,
    Wifi,
    Kebersihan,
    Perbaikan,
    Gaji,
    Modal,
    Lainnya,
}

impl ExpenseCategory {
    /// Lenient parse for the OCR oracle: unknown categories collapse to
    /// `lainnya` instead of failing the scan.
    pub fn from_oracle(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "listrik" => Self::Listrik,
            "air" => Self::Air,
            "wifi" => Self::Wifi,
            "kebersihan" => Self::Kebersihan,
            "perbaikan" => Self::Perbaikan,
            "gaji" => Self::Gaji,
            "modal" => Self::Modal,
            _ => Self::Lainnya,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listrik => "listrik",
            Self::Air => "air",
            Self::Wifi => "wifi",
            Self::Kebersihan => "kebersihan",
            Self::Perbaikan => "perbaikan",
            Self::Gaji => "gaji",
            Self::Modal => "modal",
            Self::Lainnya => "lainnya",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Expense {
    pub id: Uuid,
    pub property_id: String,
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub method: PayMethod,
    pub status: ExpenseStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub cashflow_type: CashflowType,
    pub receipt_key: Option<String>,
    pub ocr_json: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

fn default_status() -> ExpenseStatus {
    ExpenseStatus::Confirmed
}

fn default_type() -> CashflowType {
    CashflowType::Expense
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExpensePayload {
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    #[validate(range(min = 1, message = "Jumlah harus bilangan positif"))]
    pub amount: i64,
    pub method: PayMethod,
    pub receipt_key: Option<String>,
    #[validate(length(max = 500, message = "Catatan maksimal 500 karakter"))]
    pub notes: Option<String>,
    #[serde(default = "default_status")]
    pub status: ExpenseStatus,
    #[serde(rename = "type", default = "default_type")]
    pub cashflow_type: CashflowType,
}

/// Partial update, also used as the optional correction body when a draft
/// gets confirmed.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateExpensePayload {
    pub expense_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
    #[validate(range(min = 1, message = "Jumlah harus bilangan positif"))]
    pub amount: Option<i64>,
    pub method: Option<PayMethod>,
    #[validate(length(max = 500, message = "Catatan maksimal 500 karakter"))]
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub cashflow_type: Option<CashflowType>,
}

impl UpdateExpensePayload {
    pub fn is_empty(&self) -> bool {
        self.expense_date.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.method.is_none()
            && self.notes.is_none()
            && self.cashflow_type.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseListResponse {
    pub period: String,
    pub total_income: i64,
    pub total_expense: i64,
    pub expenses: Vec<Expense>,
}

// ── Receipt scan ─────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanReceiptPayload {
    /// Receipt image, base64-encoded.
    #[validate(length(min = 1, message = "Gambar nota wajib diisi"))]
    pub image_base64: String,
    /// Image mime type, e.g. `image/jpeg`.
    #[validate(length(min = 1, message = "Mime type wajib diisi"))]
    pub mime_type: String,
    pub expense_date: Option<NaiveDate>,
    /// Object key of the already-uploaded receipt image, stored on the
    /// draft so the confirmed expense keeps its proof reference.
    pub receipt_key: Option<String>,
}

/// Structured fields extracted from a receipt by the vision model. Treated
/// as untrusted input: amount and category are re-validated before anything
/// is persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReceiptScan {
    pub merchant_name: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub total_amount: Option<i64>,
    pub suggested_category: ExpenseCategory,
    pub confidence: f64,
    pub notes: Option<String>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub raw_json: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanReceiptResponse {
    pub expense_id: Uuid,
    pub status: ExpenseStatus,
    pub ocr: ReceiptScan,
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: i64,
}
