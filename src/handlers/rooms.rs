// src/handlers/rooms.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::room::{BulkRatePayload, CreateRoomPayload, CreatedRoom, RoomWithTenant, UpdateRoomPayload},
};

// GET /api/rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    responses(
        (status = 200, description = "Daftar kamar dengan penghuni aktif", body = [RoomWithTenant])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state
        .room_repo
        .list_with_tenant(&app_state.config.property_id)
        .await?;
    Ok((StatusCode::OK, Json(rooms)))
}

// POST /api/rooms
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomPayload,
    responses(
        (status = 201, description = "Kamar dibuat", body = CreatedRoom),
        (status = 409, description = "Nomor kamar sudah dipakai")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let id = app_state
        .room_repo
        .create(
            &app_state.config.property_id,
            payload.room_no,
            payload.monthly_rate,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedRoom {
            id,
            room_no: payload.room_no,
            monthly_rate: payload.monthly_rate,
        }),
    ))
}

// PATCH /api/rooms/{id}
#[utoipa::path(
    patch,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID kamar")),
    request_body = UpdateRoomPayload,
    responses(
        (status = 200, description = "Kamar diperbarui"),
        (status = 404, description = "Kamar tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_room(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.monthly_rate.is_none() && payload.is_active.is_none() {
        return Err(AppError::bad_request("Tidak ada data untuk diperbarui"));
    }
    let affected = app_state.room_repo.update(id, &payload).await?;
    if affected == 0 {
        return Err(AppError::not_found("Kamar tidak ditemukan"));
    }
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// POST /api/rooms/bulk-rate
#[utoipa::path(
    post,
    path = "/api/rooms/bulk-rate",
    tag = "Rooms",
    request_body = BulkRatePayload,
    responses(
        (status = 200, description = "Tarif diterapkan ke semua kamar")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_rate(
    State(app_state): State<AppState>,
    _gate: RequireRole<AdminOnly>,
    Json(payload): Json<BulkRatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let affected = app_state
        .room_repo
        .bulk_rate(&app_state.config.property_id, payload.monthly_rate)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "updated": affected }))))
}
