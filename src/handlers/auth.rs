// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::Authenticated,
    models::auth::{
        ForgotPasswordPayload, LoginPayload, LoginResponse, MeResponse, ResetPasswordPayload,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login berhasil", body = LoginResponse),
        (status = 401, description = "Email atau password salah")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = app_state.auth_service.login(payload).await?;
    Ok((StatusCode::OK, Json(response)))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Profil pengguna aktif", body = MeResponse),
        (status = 401, description = "Tidak terautentikasi")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(Authenticated(user): Authenticated) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(MeResponse {
            email: user.email,
            name: user.name,
            role: user.role,
        }),
    )
}

// POST /api/auth/forgot-password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Selalu ok, terlepas dari keberadaan email")
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    app_state.auth_service.forgot_password(payload).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password diperbarui"),
        (status = 400, description = "Token tidak valid atau kedaluwarsa")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    app_state.auth_service.reset_password(payload).await?;
    Ok((StatusCode::OK, Json(json!({ "ok": true }))))
}
