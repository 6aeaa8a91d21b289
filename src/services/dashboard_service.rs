// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::{error::AppError, period::Period},
    db::DashboardRepository,
    models::dashboard::DashboardData,
};

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
    repo: DashboardRepository,
    property_id: String,
}

impl DashboardService {
    pub fn new(pool: PgPool, repo: DashboardRepository, property_id: String) -> Self {
        Self {
            pool,
            repo,
            property_id,
        }
    }

    pub async fn get(&self, period: Period) -> Result<DashboardData, AppError> {
        self.repo
            .get_dashboard(&self.pool, &self.property_id, &period.to_string())
            .await
    }
}
