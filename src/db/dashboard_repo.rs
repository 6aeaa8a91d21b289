// src/db/dashboard_repo.rs

use sqlx::{Acquire, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{
        ArrearsEntry, CategoryTotal, DashboardData, PaidEntry, PeriodCategoryRow,
        PeriodTotalRow, UnpaidEntry,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The full period dashboard. The sub-queries run inside one read
    /// transaction so the report is assembled from a single snapshot; no
    /// stronger consistency than read-committed is promised.
    pub async fn get_dashboard<'a, A>(
        &self,
        conn: A,
        property_id: &str,
        period: &str,
    ) -> Result<DashboardData, AppError>
    where
        A: Acquire<'a, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        // A. Cash income for the period (ledger rows of type 'income').
        let income_total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT FROM expenses
            WHERE property_id = $1 AND to_char(expense_date, 'YYYY-MM') = $2
              AND status = 'confirmed' AND type = 'income'
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_one(&mut *tx)
        .await?;

        // B. Confirmed expenses for the period.
        let expense_total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT FROM expenses
            WHERE property_id = $1 AND to_char(expense_date, 'YYYY-MM') = $2
              AND status = 'confirmed' AND type = 'expense'
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_one(&mut *tx)
        .await?;

        // C. Per-category expense breakdown, biggest bucket first.
        let expense_breakdown = sqlx::query_as::<_, CategoryTotal>(
            r#"
            SELECT category, SUM(amount)::BIGINT AS total
            FROM expenses
            WHERE property_id = $1 AND to_char(expense_date, 'YYYY-MM') = $2
              AND status = 'confirmed' AND type = 'expense'
            GROUP BY category
            ORDER BY total DESC
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&mut *tx)
        .await?;

        // D. Unpaid invoices of the period.
        let unpaid_tenants = sqlx::query_as::<_, UnpaidEntry>(
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
        .fetch_all(&mut *tx)
        .await?;

        // E. Paid invoices of the period, with the payment timestamp.
        let paid_tenants = sqlx::query_as::<_, PaidEntry>(
            r#"
            SELECT i.tenant_id, t.name, r.room_no, i.id AS invoice_id, i.paid_at, i.amount
            FROM invoices i
            JOIN tenants t ON t.id = i.tenant_id
            JOIN rooms r ON r.id = i.room_id
            WHERE i.property_id = $1 AND i.period = $2 AND i.status = 'paid'
            ORDER BY r.room_no
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&mut *tx)
        .await?;

        // F. Nunggak: any unpaid invoice in a period STRICTLY BEFORE the
        // viewed one. Periods are zero-padded text, so `<` is chronological.
        // Arrears are relative to the viewed period, not to today.
        let nunggak_tenants = sqlx::query_as::<_, ArrearsEntry>(
            r#"
            SELECT i.tenant_id, t.name, r.room_no,
                   MIN(i.period) AS oldest_period,
                   SUM(i.amount)::BIGINT AS total_owed
            FROM invoices i
            JOIN tenants t ON t.id = i.tenant_id
            JOIN rooms r ON r.id = i.room_id
            WHERE i.property_id = $1 AND i.period < $2 AND i.status = 'unpaid'
            GROUP BY i.tenant_id, t.name, r.room_no
            ORDER BY oldest_period
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardData {
            period: period.to_string(),
            income_total,
            expense_total,
            net_total: income_total - expense_total,
            expense_breakdown,
            unpaid_tenants,
            paid_tenants,
            nunggak_tenants,
        })
    }

    // Report feed: confirmed expense totals per period.
    pub async fn expense_totals_by_period(
        &self,
        property_id: &str,
        periods: &[String],
    ) -> Result<Vec<PeriodTotalRow>, AppError> {
        let rows = sqlx::query_as::<_, PeriodTotalRow>(
            r#"
            SELECT to_char(expense_date, 'YYYY-MM') AS period,
                   COALESCE(SUM(amount), 0)::BIGINT AS total
            FROM expenses
            WHERE property_id = $1 AND status = 'confirmed' AND type = 'expense'
              AND to_char(expense_date, 'YYYY-MM') = ANY($2)
            GROUP BY 1
            "#,
        )
        .bind(property_id)
        .bind(periods)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Report feed: per-category stacked sums per period.
    pub async fn expense_categories_by_period(
        &self,
        property_id: &str,
        periods: &[String],
    ) -> Result<Vec<PeriodCategoryRow>, AppError> {
        let rows = sqlx::query_as::<_, PeriodCategoryRow>(
            r#"
            SELECT to_char(expense_date, 'YYYY-MM') AS period, category,
                   COALESCE(SUM(amount), 0)::BIGINT AS total
            FROM expenses
            WHERE property_id = $1 AND status = 'confirmed' AND type = 'expense'
              AND to_char(expense_date, 'YYYY-MM') = ANY($2)
            GROUP BY 1, category
            ORDER BY 1, category
            "#,
        )
        .bind(property_id)
        .bind(periods)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
