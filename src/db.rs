pub mod dashboard_repo;
pub mod expense_repo;
pub mod invoice_repo;
pub mod room_repo;
pub mod settings_repo;
pub mod tenant_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepository;
pub use expense_repo::ExpenseRepository;
pub use invoice_repo::InvoiceRepository;
pub use room_repo::RoomRepository;
pub use settings_repo::SettingsRepository;
pub use tenant_repo::TenantRepository;
pub use user_repo::UserRepository;
