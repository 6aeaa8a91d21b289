// src/handlers/expenses.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::PeriodQuery,
    middleware::{
        auth::Authenticated,
        rbac::{AdminOnly, RequireRole},
    },
    models::expense::{
        CreateExpensePayload, Expense, ExpenseListResponse, ScanReceiptPayload,
        ScanReceiptResponse, UpdateExpensePayload,
    },
};

fn with_warning(expense: Expense, warning: Option<String>) -> serde_json::Value {
    match warning {
        Some(warning) => json!({ "expense": expense, "warning": warning }),
        None => json!({ "expense": expense }),
    }
}

// GET /api/expenses?period=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Expenses",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Buku kas periode, draft ikut tampil", body = ExpenseListResponse),
        (status = 400, description = "Format periode tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.resolve()?;
    let response = app_state.expense_service.list_for_period(period).await?;
    Ok((StatusCode::OK, Json(response)))
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Expenses",
    request_body = CreateExpensePayload,
    responses(
        (status = 201, description = "Transaksi kas dicatat", body = Expense)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CreateExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (expense, warning) = app_state.expense_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(with_warning(expense, warning))))
}

// POST /api/expenses/{id}/confirm
#[utoipa::path(
    post,
    path = "/api/expenses/{id}/confirm",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID transaksi draft")),
    request_body = UpdateExpensePayload,
    responses(
        (status = 200, description = "Draft dikonfirmasi, koreksi diterapkan", body = Expense),
        (status = 404, description = "Pengeluaran tidak ditemukan"),
        (status = 409, description = "Pengeluaran sudah dikonfirmasi")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_expense(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
    corrections: Option<Json<UpdateExpensePayload>>,
) -> Result<impl IntoResponse, AppError> {
    let corrections = corrections.map(|Json(c)| c).unwrap_or_default();
    corrections.validate()?;
    let (expense, warning) = app_state
        .expense_service
        .confirm(&user, id, corrections)
        .await?;
    Ok((StatusCode::OK, Json(with_warning(expense, warning))))
}

// PATCH /api/expenses/{id}
#[utoipa::path(
    patch,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID transaksi")),
    request_body = UpdateExpensePayload,
    responses(
        (status = 200, description = "Transaksi diperbarui", body = Expense),
        (status = 404, description = "Pengeluaran tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let expense = app_state.expense_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(expense)))
}

// DELETE /api/expenses/{id}
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID transaksi")),
    responses(
        (status = 200, description = "Transaksi dihapus"),
        (status = 404, description = "Pengeluaran tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.expense_service.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// POST /api/expenses/scan
#[utoipa::path(
    post,
    path = "/api/expenses/scan",
    tag = "Expenses",
    request_body = ScanReceiptPayload,
    responses(
        (status = 201, description = "Nota dipindai, draft pengeluaran dibuat", body = ScanReceiptResponse),
        (status = 400, description = "GROQ_API_KEY belum dikonfigurasi"),
        (status = 502, description = "Layanan OCR gagal")
    ),
    security(("api_jwt" = []))
)]
pub async fn scan_receipt(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<ScanReceiptPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = app_state.expense_service.scan_receipt(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
