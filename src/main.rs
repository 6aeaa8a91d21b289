// src/main.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod integrations;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Database migrations applied");

    // The settings singleton must exist before the first read.
    app_state
        .settings_repo
        .ensure(&app_state.config.property_id)
        .await?;

    spawn_reminder_ticker(app_state.clone());

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password));

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}/deactivate",
            patch(handlers::users::deactivate_user),
        )
        .route("/users/{id}", delete(handlers::users::delete_user))
        .route(
            "/rooms",
            get(handlers::rooms::list_rooms).post(handlers::rooms::create_room),
        )
        .route("/rooms/{id}", patch(handlers::rooms::update_room))
        .route("/rooms/bulk-rate", post(handlers::rooms::bulk_rate))
        .route(
            "/tenants",
            get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant),
        )
        .route(
            "/tenants/{id}",
            patch(handlers::tenants::update_tenant)
                .delete(handlers::tenants::delete_tenant),
        )
        .route("/tenants/{id}/move-out", post(handlers::tenants::move_out))
        .route("/invoices", get(handlers::invoices::list_invoices))
        .route(
            "/invoices/generate",
            post(handlers::invoices::generate_invoices),
        )
        .route("/payments", post(handlers::invoices::record_payment))
        .route(
            "/expenses",
            get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            patch(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
        .route(
            "/expenses/{id}/confirm",
            post(handlers::expenses::confirm_expense),
        )
        .route("/expenses/scan", post(handlers::expenses::scan_receipt))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/reports/expenses",
            get(handlers::dashboard::expense_report),
        )
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route(
            "/cron/generate-invoices",
            post(handlers::cron::generate_invoices),
        )
        .route("/cron/reminders", get(handlers::cron::reminder_plan))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(cors_layer(&app_state.config.app_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.config.bind_addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    if parsed.is_empty() {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        layer.allow_origin(parsed)
    }
}

// Daily log of unpaid invoices for the current period. WhatsApp delivery is
// out of scope; the operator reads this or hits /api/cron/reminders.
fn spawn_reminder_ticker(app_state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
        loop {
            interval.tick().await;
            match app_state.invoice_service.reminder_plan().await {
                Ok(plan) => tracing::info!(
                    "Reminder check: {} unpaid invoice(s) for period {}",
                    plan.planned_reminders,
                    plan.period
                ),
                Err(e) => tracing::warn!("Reminder check failed: {e}"),
            }
        }
    });
}
