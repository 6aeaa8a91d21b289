// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        DashboardRepository, ExpenseRepository, InvoiceRepository, RoomRepository,
        SettingsRepository, TenantRepository, UserRepository,
    },
    integrations::{groq::GroqVision, mailer::Mailer, sheets::SheetsClient},
    services::{
        auth::AuthService, dashboard_service::DashboardService, expense_service::ExpenseService,
        invoice_service::InvoiceService, mirror_service::MirrorService,
        report_service::ReportService,
    },
};

const DEFAULT_PROPERTY_ID: &str = "prop_kostannisa";

/// Environment-driven configuration, read once at startup. Integration
/// values double as fallbacks for their settings-table counterparts.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub property_id: String,
    pub bind_addr: String,
    pub app_origins: Vec<String>,
    pub resend_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub google_service_account_json: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_income_sheet_name: Option<String>,
    pub sheets_expense_sheet_name: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let app_origins = env::var("APP_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            property_id: env::var("PROPERTY_ID")
                .unwrap_or_else(|_| DEFAULT_PROPERTY_ID.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            app_origins,
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            groq_api_key: env::var("GROQ_API_KEY").ok(),
            google_service_account_json: env::var("GOOGLE_SERVICE_ACCOUNT_JSON").ok(),
            sheets_spreadsheet_id: env::var("SHEETS_SPREADSHEET_ID").ok(),
            sheets_income_sheet_name: env::var("SHEETS_INCOME_SHEET_NAME").ok(),
            sheets_expense_sheet_name: env::var("SHEETS_EXPENSE_SHEET_NAME").ok(),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub invoice_service: InvoiceService,
    pub expense_service: ExpenseService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub room_repo: RoomRepository,
    pub tenant_repo: TenantRepository,
    pub settings_repo: SettingsRepository,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Database connection established");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        // --- Dependency graph ---
        let user_repo = UserRepository::new(db_pool.clone());
        let room_repo = RoomRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let expense_repo = ExpenseRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let mailer = Mailer::new(http.clone());
        let sheets = SheetsClient::new(http.clone());
        let extractor = Arc::new(GroqVision::new(http));

        let mirror_service =
            MirrorService::new(settings_repo.clone(), sheets, config.clone());
        let auth_service = AuthService::new(user_repo, mailer, config.clone());
        let invoice_service = InvoiceService::new(
            db_pool.clone(),
            invoice_repo,
            mirror_service.clone(),
            config.property_id.clone(),
        );
        let expense_service = ExpenseService::new(
            expense_repo,
            settings_repo.clone(),
            extractor,
            mirror_service,
            config.clone(),
        );
        let dashboard_service = DashboardService::new(
            db_pool.clone(),
            dashboard_repo.clone(),
            config.property_id.clone(),
        );
        let report_service = ReportService::new(dashboard_repo, config.property_id.clone());

        Ok(Self {
            db_pool,
            config,
            auth_service,
            invoice_service,
            expense_service,
            dashboard_service,
            report_service,
            room_repo,
            tenant_repo,
            settings_repo,
        })
    }
}
