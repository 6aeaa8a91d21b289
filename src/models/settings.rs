// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Settings {
    pub property_id: String,
    pub default_monthly_rate: i64,
    pub default_deposit: i64,
    pub reminder_rules: Option<String>,
    pub groq_api_key: Option<String>,
    pub google_service_account_json: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_income_sheet_name: Option<String>,
    pub sheets_expense_sheet_name: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Settings {
    /// Settings as shown to non-owner roles: the service-account JSON is
    /// stripped and API keys reduced to a prefix.
    pub fn masked(&self) -> MaskedSettings {
        MaskedSettings {
            property_id: self.property_id.clone(),
            default_monthly_rate: self.default_monthly_rate,
            default_deposit: self.default_deposit,
            reminder_rules: self.reminder_rules.clone(),
            groq_api_key: self.groq_api_key.as_deref().map(mask_key),
            sheets_spreadsheet_id: self.sheets_spreadsheet_id.clone(),
            sheets_income_sheet_name: self.sheets_income_sheet_name.clone(),
            sheets_expense_sheet_name: self.sheets_expense_sheet_name.clone(),
            has_service_account: self.google_service_account_json.is_some(),
            updated_at: self.updated_at,
        }
    }
}

fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("{prefix}...")
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaskedSettings {
    pub property_id: String,
    pub default_monthly_rate: i64,
    pub default_deposit: i64,
    pub reminder_rules: Option<String>,
    pub groq_api_key: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_income_sheet_name: Option<String>,
    pub sheets_expense_sheet_name: Option<String>,
    pub has_service_account: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsPayload {
    #[validate(range(min = 0, message = "Tarif tidak boleh negatif"))]
    pub default_monthly_rate: Option<i64>,
    #[validate(range(min = 0, message = "Deposit tidak boleh negatif"))]
    pub default_deposit: Option<i64>,
    pub reminder_rules: Option<String>,
    pub groq_api_key: Option<String>,
    pub google_service_account_json: Option<String>,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_income_sheet_name: Option<String>,
    pub sheets_expense_sheet_name: Option<String>,
}

impl UpdateSettingsPayload {
    pub fn is_empty(&self) -> bool {
        self.default_monthly_rate.is_none()
            && self.default_deposit.is_none()
            && self.reminder_rules.is_none()
            && self.groq_api_key.is_none()
            && self.google_service_account_json.is_none()
            && self.sheets_spreadsheet_id.is_none()
            && self.sheets_income_sheet_name.is_none()
            && self.sheets_expense_sheet_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_strips_secrets() {
        let settings = Settings {
            property_id: "prop_kostannisa".into(),
            default_monthly_rate: 1_000_000,
            default_deposit: 500_000,
            reminder_rules: None,
            groq_api_key: Some("gsk_supersecretkey123".into()),
            google_service_account_json: Some("{\"private_key\":\"...\"}".into()),
            sheets_spreadsheet_id: Some("sheet123".into()),
            sheets_income_sheet_name: None,
            sheets_expense_sheet_name: None,
            updated_at: None,
        };
        let masked = settings.masked();
        assert_eq!(masked.groq_api_key.as_deref(), Some("gsk_supe..."));
        assert!(masked.has_service_account);
        let json = serde_json::to_string(&masked).unwrap();
        assert!(!json.contains("private_key"));
        assert!(!json.contains("supersecretkey"));
    }
}
