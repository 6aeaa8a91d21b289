// src/db/settings_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::settings::{Settings, UpdateSettingsPayload},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the property's settings row if it does not exist yet. Called
    /// once at startup so every later read can assume the singleton.
    pub async fn ensure(&self, property_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO settings (property_id)
            VALUES ($1)
            ON CONFLICT (property_id) DO NOTHING
            "#,
        )
        .bind(property_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, property_id: &str) -> Result<Settings, AppError> {
        let settings =
            sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE property_id = $1")
                .bind(property_id)
                .fetch_optional(&self.pool)
                .await?;
        settings.ok_or_else(|| AppError::not_found("Pengaturan tidak ditemukan"))
    }

    pub async fn update(
        &self,
        property_id: &str,
        input: &UpdateSettingsPayload,
    ) -> Result<Settings, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE settings SET ");
        let mut sets = qb.separated(", ");
        if let Some(rate) = input.default_monthly_rate {
            sets.push("default_monthly_rate = ");
            sets.push_bind_unseparated(rate);
        }
        if let Some(deposit) = input.default_deposit {
            sets.push("default_deposit = ");
            sets.push_bind_unseparated(deposit);
        }
        if let Some(ref rules) = input.reminder_rules {
            sets.push("reminder_rules = ");
            sets.push_bind_unseparated(rules.clone());
        }
        if let Some(ref key) = input.groq_api_key {
            sets.push("groq_api_key = ");
            sets.push_bind_unseparated(key.clone());
        }
        if let Some(ref sa) = input.google_service_account_json {
            sets.push("google_service_account_json = ");
            sets.push_bind_unseparated(sa.clone());
        }
        if let Some(ref id) = input.sheets_spreadsheet_id {
            sets.push("sheets_spreadsheet_id = ");
            sets.push_bind_unseparated(id.clone());
        }
        if let Some(ref name) = input.sheets_income_sheet_name {
            sets.push("sheets_income_sheet_name = ");
            sets.push_bind_unseparated(name.clone());
        }
        if let Some(ref name) = input.sheets_expense_sheet_name {
            sets.push("sheets_expense_sheet_name = ");
            sets.push_bind_unseparated(name.clone());
        }
        sets.push("updated_at = NOW()");
        qb.push(" WHERE property_id = ");
        qb.push_bind(property_id.to_string());
        qb.push(" RETURNING *");

        let settings = qb
            .build_query_as::<Settings>()
            .fetch_one(&self.pool)
            .await?;
        Ok(settings)
    }
}
