// src/services/invoice_service.rs

use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    db::InvoiceRepository,
    integrations::sheets::{CashflowRow, TenantPaymentRow},
    models::{
        auth::AuthUser,
        dashboard::ReminderPlan,
        invoice::{
            BillableTenant, CreatePaymentPayload, CreatedInvoice, GenerateInvoicesResponse,
            InvoiceListResponse, InvoiceStatus, PaymentResponse, PlannedInvoice,
        },
    },
    services::mirror_service::MirrorService,
};

/// Decides which invoices a generation call must create.
///
/// Pure over the fetched state: tenants already in `existing` are skipped
/// silently, numbering starts at `existing_count + 1` and increments per
/// planned invoice, and the amount freezes the room rate as fetched. Calling
/// this again with the created invoices folded into `existing` yields an
/// empty plan, which is the generator's idempotency property.
pub fn plan_invoices(
    period: Period,
    tenants: &[BillableTenant],
    existing: &HashSet<Uuid>,
    existing_count: i64,
) -> Vec<PlannedInvoice> {
    let mut seq = existing_count + 1;
    let mut planned = Vec::new();
    for tenant in tenants {
        if existing.contains(&tenant.id) {
            continue;
        }
        planned.push(PlannedInvoice {
            tenant_id: tenant.id,
            room_id: tenant.room_id,
            invoice_no: period.invoice_no(seq),
            tenant_name: tenant.name.clone(),
            room_no: tenant.room_no,
            amount: tenant.monthly_rate,
        });
        seq += 1;
    }
    planned
}

#[derive(Clone)]
pub struct InvoiceService {
    pool: PgPool,
    repo: InvoiceRepository,
    mirror: MirrorService,
    property_id: String,
}

impl InvoiceService {
    pub fn new(
        pool: PgPool,
        repo: InvoiceRepository,
        mirror: MirrorService,
        property_id: String,
    ) -> Self {
        Self {
            pool,
            repo,
            mirror,
            property_id,
        }
    }

    pub async fn list_for_period(&self, period: Period) -> Result<InvoiceListResponse, AppError> {
        let invoices = self
            .repo
            .list_for_period(&self.property_id, &period.to_string())
            .await?;
        Ok(InvoiceListResponse {
            period: period.to_string(),
            invoices,
        })
    }

    /// Ensures every active tenant has exactly one invoice for the period.
    ///
    /// The whole batch runs in one transaction: a failure mid-batch rolls
    /// back every insert of this call, so a period is never left half
    /// billed. Re-running after a new tenant moves in tops up only that
    /// tenant. The `(tenant_id, period)` unique constraint backs this up
    /// under concurrent calls.
    pub async fn generate(&self, period: Period) -> Result<GenerateInvoicesResponse, AppError> {
        let period_str = period.to_string();
        let mut tx = self.pool.begin().await?;

        let tenants = self
            .repo
            .active_tenants_with_rate(&mut *tx, &self.property_id)
            .await?;
        let existing: HashSet<Uuid> = self
            .repo
            .invoiced_tenant_ids(&mut *tx, &self.property_id, &period_str)
            .await?
            .into_iter()
            .collect();
        let existing_count = self
            .repo
            .count_for_period(&mut *tx, &self.property_id, &period_str)
            .await?;

        let planned = plan_invoices(period, &tenants, &existing, existing_count);

        let mut created = Vec::with_capacity(planned.len());
        for invoice in &planned {
            let id = self
                .repo
                .insert(&mut *tx, &self.property_id, &period_str, invoice)
                .await?;
            created.push(CreatedInvoice {
                id,
                invoice_no: invoice.invoice_no.clone(),
                tenant_name: invoice.tenant_name.clone(),
                room_no: invoice.room_no,
                amount: invoice.amount,
            });
        }

        tx.commit().await?;

        if !created.is_empty() {
            tracing::info!(
                "Generated {} invoice(s) for period {}",
                created.len(),
                period_str
            );
        }

        Ok(GenerateInvoicesResponse {
            period: period_str,
            created_count: created.len(),
            invoices: created,
        })
    }

    /// The single state transition of the model: unpaid -> paid, one way.
    ///
    /// The transition is a conditional update, so a concurrent payment of
    /// the same invoice loses with `Conflict` instead of inserting a second
    /// payment row.
    pub async fn record_payment(
        &self,
        user: &AuthUser,
        payload: CreatePaymentPayload,
    ) -> Result<PaymentResponse, AppError> {
        let invoice = self
            .repo
            .find_by_id(payload.invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice tidak ditemukan"))?;
        if invoice.status == InvoiceStatus::Paid {
            return Err(AppError::conflict("Invoice sudah dibayar"));
        }

        let paid_at = payload.paid_at.unwrap_or_else(Utc::now);

        let mut tx = self.pool.begin().await?;
        let transitioned = self
            .repo
            .mark_paid_if_unpaid(&mut *tx, invoice.id, paid_at)
            .await?;
        if transitioned == 0 {
            // Lost the race against another payment of the same invoice.
            return Err(AppError::conflict("Invoice sudah dibayar"));
        }
        let payment_id = self
            .repo
            .insert_payment(
                &mut *tx,
                invoice.id,
                payload.amount,
                payload.method,
                payload.proof_key.as_deref(),
                payload.notes.as_deref(),
                user.id,
            )
            .await?;
        tx.commit().await?;

        // Mirror after commit; failure is only a warning.
        let warning = self.mirror_payment(&invoice.id, payload.amount, &payload, paid_at, user).await;

        Ok(PaymentResponse {
            payment_id,
            invoice_id: invoice.id,
            status: InvoiceStatus::Paid,
            paid_at,
            warning,
        })
    }

    async fn mirror_payment(
        &self,
        invoice_id: &Uuid,
        amount: i64,
        payload: &CreatePaymentPayload,
        paid_at: chrono::DateTime<Utc>,
        user: &AuthUser,
    ) -> Option<String> {
        let detail = match self.repo.find_with_tenant(*invoice_id).await {
            Ok(Some(detail)) => detail,
            _ => return Some("Sheets sync skipped: invoice detail unavailable".to_string()),
        };
        let method = serde_json::to_value(payload.method)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let notes = payload.notes.clone().unwrap_or_default();

        let recap_warning = self
            .mirror
            .mirror_tenant_payment(TenantPaymentRow {
                date_paid: paid_at.to_rfc3339(),
                period: detail.period.clone(),
                invoice_no: detail.invoice_no.clone(),
                tenant_name: detail.tenant_name.clone(),
                room_no: detail.room_no,
                amount,
                method: method.clone(),
                notes: notes.clone(),
                created_by: user.email.clone(),
            })
            .await;

        let cashflow_warning = self
            .mirror
            .mirror_cashflow(CashflowRow {
                date: paid_at.to_rfc3339(),
                cashflow_label: "Pemasukan".to_string(),
                description: format!(
                    "Pembayaran Kost: {} (Kamar {}) {}",
                    detail.tenant_name, detail.room_no, detail.period
                ),
                amount,
                method,
                status: "paid".to_string(),
                created_by: user.email.clone(),
                notes,
                receipt_url: payload.proof_key.clone(),
            })
            .await;

        recap_warning.or(cashflow_warning)
    }

    // Feed for the reminder stub: unpaid invoices of the current period.
    pub async fn reminder_plan(&self) -> Result<ReminderPlan, AppError> {
        let period = Period::current();
        let tenants = self
            .repo
            .unpaid_for_period(&self.property_id, &period.to_string())
            .await?;
        Ok(ReminderPlan {
            period: period.to_string(),
            planned_reminders: tenants.len(),
            tenants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billable(name: &str, room_no: i32, rate: i64) -> BillableTenant {
        BillableTenant {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            name: name.to_string(),
            room_no,
            monthly_rate: rate,
        }
    }

    #[test]
    fn plans_one_invoice_per_uninvoiced_tenant() {
        let period: Period = "2025-01".parse().unwrap();
        let tenants = vec![
            billable("Andi", 1, 1_000_000),
            billable("Budi", 2, 1_000_000),
            billable("Citra", 3, 1_000_000),
        ];
        let planned = plan_invoices(period, &tenants, &HashSet::new(), 0);
        assert_eq!(planned.len(), 3);
        let numbers: Vec<&str> = planned.iter().map(|p| p.invoice_no.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["INV-202501-0001", "INV-202501-0002", "INV-202501-0003"]
        );
        assert!(planned.iter().all(|p| p.amount == 1_000_000));
    }

    #[test]
    fn replanning_with_everyone_invoiced_is_empty() {
        let period: Period = "2025-01".parse().unwrap();
        let tenants = vec![billable("Andi", 1, 900_000), billable("Budi", 2, 950_000)];
        let all: HashSet<Uuid> = tenants.iter().map(|t| t.id).collect();
        let planned = plan_invoices(period, &tenants, &all, 2);
        assert!(planned.is_empty());
    }

    #[test]
    fn tops_up_only_the_new_tenant_with_continuing_sequence() {
        let period: Period = "2025-02".parse().unwrap();
        let old = billable("Andi", 1, 800_000);
        let new = billable("Dewi", 4, 1_200_000);
        let tenants = vec![old.clone(), new.clone()];
        let existing: HashSet<Uuid> = [old.id].into_iter().collect();
        let planned = plan_invoices(period, &tenants, &existing, 1);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].tenant_id, new.id);
        // Sequence continues from the count of existing invoices.
        assert_eq!(planned[0].invoice_no, "INV-202502-0002");
        assert_eq!(planned[0].amount, 1_200_000);
    }

    #[test]
    fn amount_is_frozen_at_planning_time() {
        let period: Period = "2025-03".parse().unwrap();
        let tenant = billable("Eka", 5, 1_000_000);
        let planned = plan_invoices(period, &[tenant], &HashSet::new(), 0);
        // The planned amount is a copy; the fetched rate is not referenced
        // again after planning.
        assert_eq!(planned[0].amount, 1_000_000);
    }
}
