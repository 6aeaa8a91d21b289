pub mod auth;
pub mod dashboard;
pub mod expense;
pub mod invoice;
pub mod room;
pub mod settings;
pub mod tenant;
