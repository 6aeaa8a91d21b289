// src/handlers/invoices.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::PeriodQuery,
    middleware::auth::Authenticated,
    models::invoice::{
        CreatePaymentPayload, GenerateInvoicesResponse, InvoiceListResponse, PaymentResponse,
    },
};

// GET /api/invoices?period=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Tagihan periode", body = InvoiceListResponse),
        (status = 400, description = "Format periode tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.resolve()?;
    let response = app_state.invoice_service.list_for_period(period).await?;
    Ok((StatusCode::OK, Json(response)))
}

// POST /api/invoices/generate?period=YYYY-MM
#[utoipa::path(
    post,
    path = "/api/invoices/generate",
    tag = "Invoices",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Tagihan dibuat untuk penghuni yang belum punya; aman diulang", body = GenerateInvoicesResponse),
        (status = 400, description = "Format periode tidak valid")
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

// POST /api/payments
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pembayaran dicatat, tagihan menjadi paid", body = PaymentResponse),
        (status = 404, description = "Invoice tidak ditemukan"),
        (status = 409, description = "Invoice sudah dibayar")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = app_state
        .invoice_service
        .record_payment(&user, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}
