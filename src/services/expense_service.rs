// src/services/expense_service.rs

use std::sync::Arc;

use chrono::Local;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    config::Config,
    db::{ExpenseRepository, SettingsRepository},
    integrations::{groq::ReceiptExtractor, sheets::CashflowRow},
    models::{
        auth::AuthUser,
        expense::{
            CashflowType, CreateExpensePayload, Expense, ExpenseListResponse, ExpenseStatus,
            ScanReceiptPayload, ScanReceiptResponse, UpdateExpensePayload,
        },
    },
    services::mirror_service::MirrorService,
};

/// What a receipt scan persists as a draft row: the operator's explicit
/// date wins over the scanned one, which wins over `today`; a scan with no
/// usable amount yields 0 for the operator to correct; the uploaded
/// receipt's object key is carried onto the draft.
pub struct DraftSeed {
    pub expense_date: chrono::NaiveDate,
    pub amount: i64,
    pub notes: String,
    pub receipt_key: Option<String>,
}

pub fn draft_seed(
    payload: &ScanReceiptPayload,
    scan: &crate::models::expense::ReceiptScan,
    today: chrono::NaiveDate,
) -> DraftSeed {
    DraftSeed {
        expense_date: payload
            .expense_date
            .or(scan.transaction_date)
            .unwrap_or(today),
        amount: scan.total_amount.unwrap_or(0),
        notes: scan
            .notes
            .clone()
            .or_else(|| scan.merchant_name.clone())
            .unwrap_or_else(|| format!("OCR confidence: {:.2}", scan.confidence)),
        receipt_key: payload.receipt_key.clone(),
    }
}

/// Sums confirmed rows by cashflow direction. Drafts are visible in the list
/// but never counted.
pub fn ledger_totals(expenses: &[Expense]) -> (i64, i64) {
    let mut income = 0;
    let mut expense = 0;
    for row in expenses {
        if row.status != ExpenseStatus::Confirmed {
            continue;
        }
        match row.cashflow_type {
            CashflowType::Income => income += row.amount,
            CashflowType::Expense => expense += row.amount,
        }
    }
    (income, expense)
}

#[derive(Clone)]
pub struct ExpenseService {
    repo: ExpenseRepository,
    settings_repo: SettingsRepository,
    extractor: Arc<dyn ReceiptExtractor>,
    mirror: MirrorService,
    config: Config,
}

impl ExpenseService {
    pub fn new(
        repo: ExpenseRepository,
        settings_repo: SettingsRepository,
        extractor: Arc<dyn ReceiptExtractor>,
        mirror: MirrorService,
        config: Config,
    ) -> Self {
        Self {
            repo,
            settings_repo,
            extractor,
            mirror,
            config,
        }
    }

    pub async fn list_for_period(&self, period: Period) -> Result<ExpenseListResponse, AppError> {
        let expenses = self
            .repo
            .list_for_period(&self.config.property_id, &period.to_string())
            .await?;
        let (total_income, total_expense) = ledger_totals(&expenses);
        Ok(ExpenseListResponse {
            period: period.to_string(),
            total_income,
            total_expense,
            expenses,
        })
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        payload: CreateExpensePayload,
    ) -> Result<(Expense, Option<String>), AppError> {
        let expense = self
            .repo
            .insert(
                &self.config.property_id,
                payload.expense_date,
                payload.category,
                payload.amount,
                payload.method,
                payload.status,
                payload.cashflow_type,
                payload.receipt_key.as_deref(),
                None,
                payload.notes.as_deref(),
                user.id,
            )
            .await?;

        // Drafts are not mirrored until confirmed.
        let warning = if expense.status == ExpenseStatus::Confirmed {
            self.mirror_expense(&expense, user).await
        } else {
            None
        };
        Ok((expense, warning))
    }

    /// Confirms a draft, optionally applying corrections in the same update.
    /// A draft from a failed scan may carry amount 0; the confirmed row must
    /// not, so the final amount is checked here.
    pub async fn confirm(
        &self,
        user: &AuthUser,
        id: Uuid,
        corrections: UpdateExpensePayload,
    ) -> Result<(Expense, Option<String>), AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Pengeluaran tidak ditemukan"))?;
        if existing.status == ExpenseStatus::Confirmed {
            return Err(AppError::conflict("Pengeluaran sudah dikonfirmasi"));
        }

        let final_amount = corrections.amount.unwrap_or(existing.amount);
        if final_amount < 1 {
            return Err(AppError::bad_request("Jumlah harus bilangan positif"));
        }

        let expense = self.repo.update(id, &corrections, true).await?;
        let warning = self.mirror_expense(&expense, user).await;
        Ok((expense, warning))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateExpensePayload,
    ) -> Result<Expense, AppError> {
        if payload.is_empty() {
            return Err(AppError::bad_request("Tidak ada data untuk diperbarui"));
        }
        let existing = self.repo.find_by_id(id).await?;
        if existing.is_none() {
            return Err(AppError::not_found("Pengeluaran tidak ditemukan"));
        }
        self.repo.update(id, &payload, false).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let existing = self.repo.find_by_id(id).await?;
        if existing.is_none() {
            return Err(AppError::not_found("Pengeluaran tidak ditemukan"));
        }
        self.repo.delete(id).await
    }

    /// Runs the receipt through the vision extractor and persists a draft
    /// row carrying whatever the scan produced. The draft becomes real money
    /// only through `confirm`.
    pub async fn scan_receipt(
        &self,
        user: &AuthUser,
        payload: ScanReceiptPayload,
    ) -> Result<ScanReceiptResponse, AppError> {
        let api_key = self.groq_api_key().await.ok_or_else(|| {
            AppError::bad_request("GROQ_API_KEY belum dikonfigurasi")
        })?;

        let scan = self
            .extractor
            .extract(&api_key, &payload.image_base64, &payload.mime_type)
            .await?;

        let seed = draft_seed(&payload, &scan, Local::now().date_naive());

        let expense = self
            .repo
            .insert(
                &self.config.property_id,
                seed.expense_date,
                scan.suggested_category,
                seed.amount,
                crate::models::invoice::PayMethod::Other,
                ExpenseStatus::Draft,
                CashflowType::Expense,
                seed.receipt_key.as_deref(),
                Some(&scan.raw_json),
                Some(&seed.notes),
                user.id,
            )
            .await?;

        Ok(ScanReceiptResponse {
            expense_id: expense.id,
            status: expense.status,
            ocr: scan,
            expense_date: expense.expense_date,
            category: expense.category,
            amount: expense.amount,
        })
    }

    // Settings row first, env as fallback.
    async fn groq_api_key(&self) -> Option<String> {
        if let Ok(settings) = self.settings_repo.get(&self.config.property_id).await {
            if let Some(key) = settings.groq_api_key.filter(|k| !k.is_empty()) {
                return Some(key);
            }
        }
        self.config.groq_api_key.clone()
    }

    async fn mirror_expense(&self, expense: &Expense, user: &AuthUser) -> Option<String> {
        let label = match expense.cashflow_type {
            CashflowType::Income => "Pemasukan",
            CashflowType::Expense => "Pengeluaran",
        };
        let method = serde_json::to_value(expense.method)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        self.mirror
            .mirror_cashflow(CashflowRow {
                date: expense.expense_date.to_string(),
                cashflow_label: label.to_string(),
                description: format!(
                    "Cash: {} - {}",
                    expense.category.as_str(),
                    expense.notes.as_deref().unwrap_or("-")
                ),
                amount: expense.amount,
                method,
                status: "confirmed".to_string(),
                created_by: user.email.clone(),
                notes: expense.notes.clone().unwrap_or_default(),
                receipt_url: expense.receipt_key.clone(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::PayMethod;
    use chrono::{NaiveDate, Utc};

    fn row(amount: i64, status: ExpenseStatus, cashflow_type: CashflowType) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            property_id: "prop_kostannisa".to_string(),
            expense_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            category: crate::models::expense::ExpenseCategory::Listrik,
            amount,
            method: PayMethod::Cash,
            status,
            cashflow_type,
            receipt_key: None,
            ocr_json: None,
            notes: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_split_by_direction() {
        let rows = vec![
            row(200_000, ExpenseStatus::Confirmed, CashflowType::Expense),
            row(150_000, ExpenseStatus::Confirmed, CashflowType::Expense),
            row(500_000, ExpenseStatus::Confirmed, CashflowType::Income),
        ];
        let (income, expense) = ledger_totals(&rows);
        assert_eq!(income, 500_000);
        assert_eq!(expense, 350_000);
    }

    #[test]
    fn drafts_are_listed_but_not_counted() {
        let rows = vec![
            row(200_000, ExpenseStatus::Confirmed, CashflowType::Expense),
            row(999_999, ExpenseStatus::Draft, CashflowType::Expense),
            row(999_999, ExpenseStatus::Draft, CashflowType::Income),
        ];
        let (income, expense) = ledger_totals(&rows);
        assert_eq!(income, 0);
        assert_eq!(expense, 200_000);
    }

    #[test]
    fn empty_ledger_totals_zero() {
        assert_eq!(ledger_totals(&[]), (0, 0));
    }

    use crate::models::expense::{ExpenseCategory, ReceiptScan, ScanReceiptPayload};

    fn scan(date: Option<NaiveDate>, amount: Option<i64>) -> ReceiptScan {
        ReceiptScan {
            merchant_name: Some("PLN".to_string()),
            transaction_date: date,
            total_amount: amount,
            suggested_category: ExpenseCategory::Listrik,
            confidence: 0.9,
            notes: None,
            raw_json: String::new(),
        }
    }

    fn scan_payload(
        expense_date: Option<NaiveDate>,
        receipt_key: Option<&str>,
    ) -> ScanReceiptPayload {
        ScanReceiptPayload {
            image_base64: "aGVsbG8=".to_string(),
            mime_type: "image/jpeg".to_string(),
            expense_date,
            receipt_key: receipt_key.map(str::to_string),
        }
    }

    #[test]
    fn draft_carries_the_uploaded_receipt_key() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let seed = draft_seed(
            &scan_payload(None, Some("receipts/2025/nota-pln.jpg")),
            &scan(None, Some(200_000)),
            today,
        );
        assert_eq!(seed.receipt_key.as_deref(), Some("receipts/2025/nota-pln.jpg"));
        assert_eq!(seed.amount, 200_000);

        let seed = draft_seed(&scan_payload(None, None), &scan(None, None), today);
        assert_eq!(seed.receipt_key, None);
        // No usable amount: the draft holds 0 until the operator corrects it.
        assert_eq!(seed.amount, 0);
    }

    #[test]
    fn draft_date_priority_is_override_then_scan_then_today() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let scanned = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let explicit = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

        let seed = draft_seed(
            &scan_payload(Some(explicit), None),
            &scan(Some(scanned), None),
            today,
        );
        assert_eq!(seed.expense_date, explicit);

        let seed = draft_seed(&scan_payload(None, None), &scan(Some(scanned), None), today);
        assert_eq!(seed.expense_date, scanned);

        let seed = draft_seed(&scan_payload(None, None), &scan(None, None), today);
        assert_eq!(seed.expense_date, today);
    }
}
