// src/db/invoice_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        dashboard::UnpaidEntry,
        invoice::{
            BillableTenant, Invoice, InvoiceWithTenant, PayMethod, PlannedInvoice,
        },
    },
};

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_period(
        &self,
        property_id: &str,
        period: &str,
    ) -> Result<Vec<InvoiceWithTenant>, AppError> {
        let invoices = sqlx::query_as::<_, InvoiceWithTenant>(
            r#"
            SELECT i.id, i.tenant_id, i.room_id, i.period, i.invoice_no, i.amount,
                   i.status, i.paid_at, t.name AS tenant_name, t.move_in_date, r.room_no
            FROM invoices i
            JOIN tenants t ON t.id = i.tenant_id
            JOIN rooms r ON r.id = i.room_id
            WHERE i.property_id = $1 AND i.period = $2
            ORDER BY r.room_no
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    // Active tenants joined with the room's current rate, in room order so
    // invoice numbering is stable.
    pub async fn active_tenants_with_rate<'e, E>(
        &self,
        executor: E,
        property_id: &str,
    ) -> Result<Vec<BillableTenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenants = sqlx::query_as::<_, BillableTenant>(
            r#"
            SELECT t.id, t.room_id, t.name, r.room_no, r.monthly_rate
            FROM tenants t
            JOIN rooms r ON r.id = t.room_id
            WHERE t.property_id = $1 AND t.is_active
            ORDER BY r.room_no
            "#,
        )
        .bind(property_id)
        .fetch_all(executor)
        .await?;
        Ok(tenants)
    }

    pub async fn invoiced_tenant_ids<'e, E>(
        &self,
        executor: E,
        property_id: &str,
        period: &str,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT tenant_id FROM invoices WHERE property_id = $1 AND period = $2",
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn count_for_period<'e, E>(
        &self,
        executor: E,
        property_id: &str,
        period: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE property_id = $1 AND period = $2",
        )
        .bind(property_id)
        .bind(period)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        property_id: &str,
        period: &str,
        planned: &PlannedInvoice,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (property_id, tenant_id, room_id, period, invoice_no, amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(property_id)
        .bind(planned.tenant_id)
        .bind(planned.room_id)
        .bind(period)
        .bind(&planned.invoice_no)
        .bind(planned.amount)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            // Concurrent generation of the same period lost the race on
            // UNIQUE(tenant_id, period).
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::conflict("Tagihan periode ini sedang dibuat proses lain")
            }
            other => AppError::from(other),
        })?;
        Ok(id)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    // Joined form, used to describe the payment in the spreadsheet mirror.
    pub async fn find_with_tenant(&self, id: Uuid) -> Result<Option<InvoiceWithTenant>, AppError> {
        let invoice = sqlx::query_as::<_, InvoiceWithTenant>(
            r#"
            SELECT i.id, i.tenant_id, i.room_id, i.period, i.invoice_no, i.amount,
                   i.status, i.paid_at, t.name AS tenant_name, t.move_in_date, r.room_no
            FROM invoices i
            JOIN tenants t ON t.id = i.tenant_id
            JOIN rooms r ON r.id = i.room_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(invoice)
    }

    /// Conditional transition to `paid`. Returns 0 rows when the invoice was
    /// already paid by a concurrent writer, which the service maps to
    /// `Conflict`.
    pub async fn mark_paid_if_unpaid<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE invoices SET status = 'paid', paid_at = $1 WHERE id = $2 AND status = 'unpaid'",
        )
        .bind(paid_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        amount: i64,
        method: PayMethod,
        proof_key: Option<&str>,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO payments (invoice_id, amount, method, proof_key, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(invoice_id)
        .bind(amount)
        .bind(method)
        .bind(proof_key)
        .bind(notes)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    // Unpaid invoices of a period, for the reminder stub.
    pub async fn unpaid_for_period(
        &self,
        property_id: &str,
        period: &str,
    ) -> Result<Vec<UnpaidEntry>, AppError> {
        let unpaid = sqlx::query_as::<_, UnpaidEntry>(
            r#"
            SELECT i.tenant_id, t.name, r.room_no, i.id AS invoice_id, i.amount
            FROM invoices i
            JOIN tenants t ON t.id = i.tenant_id
            JOIN rooms r ON r.id = i.room_id
            WHERE i.property_id = $1 AND i.period = $2 AND i.status = 'unpaid'
            ORDER BY r.room_no
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&self.pool)
        .await?;
        Ok(unpaid)
    }
}
