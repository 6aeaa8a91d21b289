// src/handlers/settings.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::Authenticated,
        rbac::{AdminOnly, RequireRole},
    },
    models::settings::{MaskedSettings, UpdateSettingsPayload},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Pengaturan properti", body = MaskedSettings)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state
        .settings_repo
        .get(&app_state.config.property_id)
        .await?;
    // Only the owner sees raw integration secrets.
    if user.role.is_owner() {
        Ok((StatusCode::OK, Json(settings)).into_response())
    } else {
        Ok((StatusCode::OK, Json(settings.masked())).into_response())
    }
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsPayload,
    responses(
        (status = 200, description = "Pengaturan diperbarui", body = MaskedSettings),
        (status = 400, description = "Tidak ada data untuk diperbarui")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    Authenticated(user): Authenticated,
    _gate: RequireRole<AdminOnly>,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::bad_request("Tidak ada data untuk diperbarui"));
    }
    // Integration secrets are owner-only even for admins.
    let touches_secrets = payload.groq_api_key.is_some()
        || payload.google_service_account_json.is_some()
        || payload.sheets_spreadsheet_id.is_some();
    if touches_secrets && !user.role.is_owner() {
        return Err(AppError::forbidden(
            "Hanya admin utama yang dapat mengubah kredensial integrasi",
        ));
    }

    let settings = app_state
        .settings_repo
        .update(&app_state.config.property_id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(settings.masked())).into_response())
}
