// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::deactivate_user,
        handlers::users::delete_user,

        // --- Rooms ---
        handlers::rooms::list_rooms,
        handlers::rooms::create_room,
        handlers::rooms::update_room,
        handlers::rooms::bulk_rate,

        // --- Tenants ---
        handlers::tenants::list_tenants,
        handlers::tenants::create_tenant,
        handlers::tenants::update_tenant,
        handlers::tenants::move_out,
        handlers::tenants::delete_tenant,

        // --- Invoices & payments ---
        handlers::invoices::list_invoices,
        handlers::invoices::generate_invoices,
        handlers::invoices::record_payment,

        // --- Expenses ---
        handlers::expenses::list_expenses,
        handlers::expenses::create_expense,
        handlers::expenses::confirm_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,
        handlers::expenses::scan_receipt,

        // --- Dashboard & reports ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::expense_report,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Cron ---
        handlers::cron::generate_invoices,
        handlers::cron::reminder_plan,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::MeResponse,
            models::auth::CreateUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,

            // --- Rooms ---
            models::room::RoomWithTenant,
            models::room::CreateRoomPayload,
            models::room::UpdateRoomPayload,
            models::room::BulkRatePayload,
            models::room::CreatedRoom,

            // --- Tenants ---
            models::tenant::TenantWithRoom,
            models::tenant::CreateTenantPayload,
            models::tenant::UpdateTenantPayload,
            models::tenant::CreatedTenant,
            handlers::tenants::MoveOutPayload,

            // --- Invoices ---
            models::invoice::InvoiceStatus,
            models::invoice::PayMethod,
            models::invoice::Invoice,
            models::invoice::InvoiceWithTenant,
            models::invoice::PlannedInvoice,
            models::invoice::GenerateInvoicesResponse,
            models::invoice::CreatedInvoice,
            models::invoice::InvoiceListResponse,
            models::invoice::CreatePaymentPayload,
            models::invoice::PaymentResponse,

            // --- Expenses ---
            models::expense::ExpenseStatus,
            models::expense::CashflowType,
            models::expense::ExpenseCategory,
            models::expense::Expense,
            models::expense::CreateExpensePayload,
            models::expense::UpdateExpensePayload,
            models::expense::ExpenseListResponse,
            models::expense::ScanReceiptPayload,
            models::expense::ReceiptScan,
            models::expense::ScanReceiptResponse,

            // --- Dashboard ---
            models::dashboard::DashboardData,
            models::dashboard::CategoryTotal,
            models::dashboard::UnpaidEntry,
            models::dashboard::PaidEntry,
            models::dashboard::ArrearsEntry,
            models::dashboard::ReportResponse,
            models::dashboard::ReportRow,
            models::dashboard::ReminderPlan,

            // --- Settings ---
            models::settings::Settings,
            models::settings::MaskedSettings,
            models::settings::UpdateSettingsPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login dan manajemen sesi"),
        (name = "Users", description = "Manajemen pengguna (admin utama)"),
        (name = "Rooms", description = "Kamar dan tarif"),
        (name = "Tenants", description = "Penghuni kost"),
        (name = "Invoices", description = "Tagihan bulanan"),
        (name = "Payments", description = "Pencatatan pembayaran"),
        (name = "Expenses", description = "Buku kas dan scan nota"),
        (name = "Dashboard", description = "Ringkasan dan laporan"),
        (name = "Settings", description = "Pengaturan properti"),
        (name = "Cron", description = "Endpoint terjadwal"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
