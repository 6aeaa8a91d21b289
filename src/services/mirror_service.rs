// src/services/mirror_service.rs

use crate::{
    config::Config,
    db::SettingsRepository,
    integrations::sheets::{CashflowRow, SheetsClient, SheetsConfig, TenantPaymentRow},
};

/// Append-only spreadsheet mirroring of cash movements.
///
/// The mirror is best-effort by contract: the domain write has already been
/// committed when these run, so every failure here is reduced to a warning
/// string that rides on the success response.
#[derive(Clone)]
pub struct MirrorService {
    settings_repo: SettingsRepository,
    sheets: SheetsClient,
    config: Config,
}

impl MirrorService {
    pub fn new(settings_repo: SettingsRepository, sheets: SheetsClient, config: Config) -> Self {
        Self {
            settings_repo,
            sheets,
            config,
        }
    }

    // None when the mirror is not configured for the property.
    async fn sheets_config(&self) -> Option<SheetsConfig> {
        let settings = self.settings_repo.get(&self.config.property_id).await.ok()?;
        SheetsConfig::resolve(&settings, &self.config)
    }

    pub async fn mirror_cashflow(&self, row: CashflowRow) -> Option<String> {
        let Some(cfg) = self.sheets_config().await else {
            return None;
        };
        match self.sheets.append_cashflow(&cfg, &row).await {
            Ok(()) => None,
            Err(e) => {
                let warning = format!("Sheets sync failed: {e}");
                tracing::warn!("{}", warning);
                Some(warning)
            }
        }
    }

    pub async fn mirror_tenant_payment(&self, row: TenantPaymentRow) -> Option<String> {
        let Some(cfg) = self.sheets_config().await else {
            return None;
        };
        match self.sheets.append_tenant_payment(&cfg, &row).await {
            Ok(()) => None,
            Err(e) => {
                let warning = format!("Sheets sync failed: {e}");
                tracing::warn!("{}", warning);
                Some(warning)
            }
        }
    }
}
