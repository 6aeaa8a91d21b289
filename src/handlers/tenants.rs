// src/handlers/tenants.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::tenant::{CreateTenantPayload, CreatedTenant, TenantWithRoom, UpdateTenantPayload},
};

// GET /api/tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    responses(
        (status = 200, description = "Daftar penghuni dengan nomor kamar", body = [TenantWithRoom])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state
        .tenant_repo
        .list_with_room(&app_state.config.property_id)
        .await?;
    Ok((StatusCode::OK, Json(tenants)))
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, description = "Penghuni dibuat", body = CreatedTenant),
        (status = 404, description = "Kamar tidak ditemukan"),
        (status = 409, description = "Kamar sudah ditempati penghuni aktif")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let id = app_state
        .tenant_repo
        .create(&app_state.config.property_id, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedTenant {
            id,
            room_id: payload.room_id,
            name: payload.name,
            move_in_date: payload.move_in_date,
            deposit_amount: payload.deposit_amount,
        }),
    ))
}

// PATCH /api/tenants/{id}
#[utoipa::path(
    patch,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID penghuni")),
    request_body = UpdateTenantPayload,
    responses(
        (status = 200, description = "Penghuni diperbarui"),
        (status = 404, description = "Penghuni tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::bad_request("Tidak ada data untuk diperbarui"));
    }
    let affected = app_state.tenant_repo.update(id, &payload).await?;
    if affected == 0 {
        return Err(AppError::not_found("Penghuni tidak ditemukan"));
    }
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MoveOutPayload {
    pub move_out_date: Option<NaiveDate>,
}

// POST /api/tenants/{id}/move-out
#[utoipa::path(
    post,
    path = "/api/tenants/{id}/move-out",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID penghuni")),
    request_body = MoveOutPayload,
    responses(
        (status = 200, description = "Penghuni dinonaktifkan, kamar dikosongkan"),
        (status = 404, description = "Penghuni tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_out(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    payload: Option<Json<MoveOutPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let move_out_date = payload
        .and_then(|Json(p)| p.move_out_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let affected = app_state.tenant_repo.deactivate(id, move_out_date).await?;
    if affected == 0 {
        return Err(AppError::not_found("Penghuni tidak ditemukan"));
    }
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// DELETE /api/tenants/{id}
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "ID penghuni")),
    responses(
        (status = 200, description = "Penghuni dihapus"),
        (status = 404, description = "Penghuni tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.tenant_repo.exists(id).await? {
        return Err(AppError::not_found("Penghuni tidak ditemukan"));
    }
    app_state.tenant_repo.delete(id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
