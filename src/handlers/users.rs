// src/handlers/users.rs

// User management, admin_utama only.

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
    middleware::rbac::{OwnerOnly, RequireRole},
    models::auth::{CreateUserPayload, User},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Daftar pengguna", body = [User]),
        (status = 403, description = "Bukan admin utama")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _gate: RequireRole<OwnerOnly>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Pengguna dibuat", body = User),
        (status = 409, description = "Email sudah terdaftar"),
        (status = 403, description = "Bukan admin utama")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _gate: RequireRole<OwnerOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = app_state.auth_service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// PATCH /api/users/{id}/deactivate
#[utoipa::path(
    patch,
    path = "/api/users/{id}/deactivate",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID pengguna")),
    responses(
        (status = 200, description = "Pengguna dinonaktifkan"),
        (status = 403, description = "Admin utama tidak dapat dinonaktifkan"),
        (status = 404, description = "Pengguna tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    _gate: RequireRole<OwnerOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.deactivate_user(id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID pengguna")),
    responses(
        (status = 200, description = "Pengguna dihapus"),
        (status = 403, description = "Admin utama tidak dapat dihapus"),
        (status = 404, description = "Pengguna tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _gate: RequireRole<OwnerOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.delete_user(id).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
