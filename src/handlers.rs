pub mod auth;
pub mod cron;
pub mod dashboard;
pub mod expenses;
pub mod invoices;
pub mod rooms;
pub mod settings;
pub mod tenants;
pub mod users;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::{error::AppError, period::Period};

/// `?period=YYYY-MM` query shared by the period-scoped endpoints. Missing
/// means the current month.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<Period, AppError> {
        match self.period.as_deref() {
            None => Ok(Period::current()),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::bad_request("Format periode tidak valid (YYYY-MM)")),
        }
    }
}
