// src/handlers/cron.rs

// Scheduled-work endpoints, callable by an external scheduler. WhatsApp
// delivery is not wired; the reminder endpoint reports what a run would
// send.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::PeriodQuery,
    models::dashboard::ReminderPlan,
    models::invoice::GenerateInvoicesResponse,
};

// POST /api/cron/generate-invoices?period=YYYY-MM
#[utoipa::path(
    post,
    path = "/api/cron/generate-invoices",
    tag = "Cron",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Generasi tagihan bulanan, aman diulang", body = GenerateInvoicesResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.resolve()?;
    let response = app_state.invoice_service.generate(period).await?;
    Ok((StatusCode::OK, Json(response)))
}

// GET /api/cron/reminders
#[utoipa::path(
    get,
    path = "/api/cron/reminders",
    tag = "Cron",
    responses(
        (status = 200, description = "Rencana pengingat untuk tagihan belum dibayar bulan ini", body = ReminderPlan)
    ),
    security(("api_jwt" = []))
)]
pub async fn reminder_plan(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let plan = app_state.invoice_service.reminder_plan().await?;
    Ok((StatusCode::OK, Json(plan)))
}
