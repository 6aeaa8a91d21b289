// src/integrations/sheets.rs

// Google Sheets append-only mirror of cash movements. Server-to-server auth
// with a service account: RS256-signed JWT exchanged for an access token,
// then a values:append call per row. Mirror failures never roll back the
// domain write; callers degrade them to a warning.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{config::Config, models::settings::Settings};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// Sheet receiving the tenant-payment recap rows.
    pub income_sheet: String,
    /// Sheet receiving the cashflow (kas) rows.
    pub expense_sheet: String,
    pub service_account: ServiceAccountKey,
}

impl SheetsConfig {
    /// Builds the mirror config from the settings row, falling back to env
    /// values. Returns `None` when the mirror is not configured, which
    /// callers treat as "skip silently".
    pub fn resolve(settings: &Settings, env: &Config) -> Option<Self> {
        let sa_json = settings
            .google_service_account_json
            .clone()
            .or_else(|| env.google_service_account_json.clone())?;
        let spreadsheet_id = settings
            .sheets_spreadsheet_id
            .clone()
            .or_else(|| env.sheets_spreadsheet_id.clone())?;
        let service_account: ServiceAccountKey = serde_json::from_str(&sa_json).ok()?;
        Some(Self {
            spreadsheet_id,
            income_sheet: settings
                .sheets_income_sheet_name
                .clone()
                .or_else(|| env.sheets_income_sheet_name.clone())
                .unwrap_or_else(|| "Income".to_string()),
            expense_sheet: settings
                .sheets_expense_sheet_name
                .clone()
                .or_else(|| env.sheets_expense_sheet_name.clone())
                .unwrap_or_else(|| "Expenses".to_string()),
            service_account,
        })
    }
}

// One row of the "Rekap Penghuni" sheet.
#[derive(Debug, Clone)]
pub struct TenantPaymentRow {
    pub date_paid: String,
    pub period: String,
    pub invoice_no: String,
    pub tenant_name: String,
    pub room_no: i32,
    pub amount: i64,
    pub method: String,
    pub notes: String,
    pub created_by: String,
}

// One row of the "Kas" cashflow sheet; covers both income and expense.
#[derive(Debug, Clone)]
pub struct CashflowRow {
    pub date: String,
    /// "Pemasukan" or "Pengeluaran".
    pub cashflow_label: String,
    pub description: String,
    pub amount: i64,
    pub method: String,
    pub status: String,
    pub created_by: String,
    pub notes: String,
    pub receipt_url: Option<String>,
}

#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn access_token(&self, sa: &ServiceAccountKey) -> anyhow::Result<String> {
        let token_uri = sa.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let now = Utc::now().timestamp();
        let claims = GrantClaims {
            iss: &sa.client_email,
            scope: SHEETS_SCOPE,
            aud: token_uri,
            exp: now + 3600,
            iat: now,
        };
        let jwt = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(sa.private_key.as_bytes())?,
        )?;

        let res = self
            .http
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await?;
        if !res.status().is_success() {
            anyhow::bail!("Token exchange failed: {}", res.text().await?);
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }
        let token: TokenResponse = res.json().await?;
        Ok(token.access_token)
    }

    async fn append_row(
        &self,
        config: &SheetsConfig,
        sheet_name: &str,
        values: Vec<String>,
    ) -> anyhow::Result<()> {
        let access_token = self.access_token(&config.service_account).await?;
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}!A:Z:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            config.spreadsheet_id, sheet_name
        );
        let res = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        if !res.status().is_success() {
            anyhow::bail!("Sheets append failed: {}", res.text().await?);
        }
        Ok(())
    }

    pub async fn append_tenant_payment(
        &self,
        config: &SheetsConfig,
        row: &TenantPaymentRow,
    ) -> anyhow::Result<()> {
        self.append_row(
            config,
            &config.income_sheet,
            vec![
                row.date_paid.clone(),
                row.period.clone(),
                row.invoice_no.clone(),
                row.tenant_name.clone(),
                row.room_no.to_string(),
                row.amount.to_string(),
                row.method.clone(),
                row.notes.clone(),
                row.created_by.clone(),
            ],
        )
        .await
    }

    pub async fn append_cashflow(
        &self,
        config: &SheetsConfig,
        row: &CashflowRow,
    ) -> anyhow::Result<()> {
        self.append_row(
            config,
            &config.expense_sheet,
            vec![
                row.date.clone(),
                row.cashflow_label.clone(),
                row.description.clone(),
                row.amount.to_string(),
                row.method.clone(),
                row.status.clone(),
                row.created_by.clone(),
                row.notes.clone(),
                row.receipt_url.clone().unwrap_or_default(),
            ],
        )
        .await
    }
}
