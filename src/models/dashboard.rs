// src/models/dashboard.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::expense::ExpenseCategory;

// 1. The period dashboard: totals, breakdown, paid/unpaid split, arrears.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardData {
    pub period: String,
    pub income_total: i64,
    pub expense_total: i64,
    pub net_total: i64,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub unpaid_tenants: Vec<UnpaidEntry>,
    pub paid_tenants: Vec<PaidEntry>,
    pub nunggak_tenants: Vec<ArrearsEntry>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UnpaidEntry {
    pub tenant_id: Uuid,
    pub name: String,
    pub room_no: i32,
    pub invoice_id: Uuid,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PaidEntry {
    pub tenant_id: Uuid,
    pub name: String,
    pub room_no: i32,
    pub invoice_id: Uuid,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount: i64,
}

/// A tenant in arrears: at least one unpaid invoice in a period strictly
/// before the viewed period. `total_owed` sums every such invoice.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ArrearsEntry {
    pub tenant_id: Uuid,
    pub name: String,
    pub room_no: i32,
    pub oldest_period: String,
    pub total_owed: i64,
}

// 2. Expense-only operational report across periods (stacked chart data).
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub data: Vec<ReportRow>,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportRow {
    pub period: String,
    pub total: i64,
    pub by_category: BTreeMap<String, i64>,
}

// Raw rows feeding the report assembly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeriodTotalRow {
    pub period: String,
    pub total: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeriodCategoryRow {
    pub period: String,
    pub category: ExpenseCategory,
    pub total: i64,
}

// 3. Reminder stub output.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReminderPlan {
    pub period: String,
    pub planned_reminders: usize,
    pub tenants: Vec<UnpaidEntry>,
}
