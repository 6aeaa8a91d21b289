// src/db/expense_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::expense::{
        CashflowType, Expense, ExpenseCategory, ExpenseStatus, UpdateExpensePayload,
    },
    models::invoice::PayMethod,
};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // All ledger rows whose date falls in the period, drafts included.
    pub async fn list_for_period(
        &self,
        property_id: &str,
        period: &str,
    ) -> Result<Vec<Expense>, AppError> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT * FROM expenses
            WHERE property_id = $1 AND to_char(expense_date, 'YYYY-MM') = $2
            ORDER BY expense_date DESC
            "#,
        )
        .bind(property_id)
        .bind(period)
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        property_id: &str,
        expense_date: NaiveDate,
        category: ExpenseCategory,
        amount: i64,
        method: PayMethod,
        status: ExpenseStatus,
        cashflow_type: CashflowType,
        receipt_key: Option<&str>,
        ocr_json: Option<&str>,
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<Expense, AppError> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses
                (property_id, expense_date, category, amount, method, status, type,
                 receipt_key, ocr_json, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(expense_date)
        .bind(category)
        .bind(amount)
        .bind(method)
        .bind(status)
        .bind(cashflow_type)
        .bind(receipt_key)
        .bind(ocr_json)
        .bind(notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(expense)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>, AppError> {
        let expense = sqlx::query_as::<_, Expense>("SELECT * FROM expenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(expense)
    }

    /// Applies the partial update; optionally flips status to `confirmed` in
    /// the same statement (the confirm-draft path).
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateExpensePayload,
        confirm: bool,
    ) -> Result<Expense, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE expenses SET ");
        let mut sets = qb.separated(", ");
        if confirm {
            sets.push("status = ");
            sets.push_bind_unseparated(ExpenseStatus::Confirmed);
        }
        if let Some(date) = input.expense_date {
            sets.push("expense_date = ");
            sets.push_bind_unseparated(date);
        }
        if let Some(category) = input.category {
            sets.push("category = ");
            sets.push_bind_unseparated(category);
        }
        if let Some(amount) = input.amount {
            sets.push("amount = ");
            sets.push_bind_unseparated(amount);
        }
        if let Some(method) = input.method {
            sets.push("method = ");
            sets.push_bind_unseparated(method);
        }
        if let Some(ref notes) = input.notes {
            sets.push("notes = ");
            sets.push_bind_unseparated(notes.clone());
        }
        if let Some(cashflow_type) = input.cashflow_type {
            sets.push("type = ");
            sets.push_bind_unseparated(cashflow_type);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");
        let expense = qb
            .build_query_as::<Expense>()
            .fetch_one(&self.pool)
            .await?;
        Ok(expense)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
