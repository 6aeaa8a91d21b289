pub mod auth;
pub mod dashboard_service;
pub mod expense_service;
pub mod invoice_service;
pub mod mirror_service;
pub mod report_service;
