// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, period::Period},
    config::AppState,
    handlers::PeriodQuery,
    models::dashboard::{DashboardData, ReportResponse},
};

// GET /api/dashboard?period=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Ringkasan keuangan periode beserta daftar nunggak", body = DashboardData),
        (status = 400, description = "Format periode tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let period = query.resolve()?;
    let data = app_state.dashboard_service.get(period).await?;
    Ok((StatusCode::OK, Json(data)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub months: Option<usize>,
}

// GET /api/reports/expenses
#[utoipa::path(
    get,
    path = "/api/reports/expenses",
    tag = "Dashboard",
    params(ReportQuery),
    responses(
        (status = 200, description = "Tren pengeluaran lintas periode untuk grafik", body = ReportResponse),
        (status = 400, description = "Format periode tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn expense_report(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let parse = |raw: &Option<String>| -> Result<Option<Period>, AppError> {
        raw.as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| AppError::bad_request("Format periode tidak valid (YYYY-MM)"))
            })
            .transpose()
    };
    let from = parse(&query.from)?;
    let to = parse(&query.to)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::bad_request("Periode awal melewati periode akhir"));
        }
    }

    let report = app_state
        .report_service
        .expense_report(from, to, query.months)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
