// src/services/report_service.rs

use std::collections::BTreeMap;

use crate::{
    common::{error::AppError, period::Period},
    db::DashboardRepository,
    models::dashboard::{PeriodCategoryRow, PeriodTotalRow, ReportResponse, ReportRow},
};

const MAX_RANGE_MONTHS: usize = 24;
const DEFAULT_MONTHS: usize = 12;

/// Expands the requested window into an explicit period list. An explicit
/// `from..=to` wins; otherwise the trailing `months` window ending at the
/// current period, capped at 24.
pub fn report_periods(
    from: Option<Period>,
    to: Option<Period>,
    months: Option<usize>,
) -> Vec<Period> {
    if let (Some(from), Some(to)) = (from, to) {
        return Period::range_inclusive(from, to);
    }
    let months = months.unwrap_or(DEFAULT_MONTHS).clamp(1, MAX_RANGE_MONTHS);
    Period::last_n_months(months as u32)
}

/// Merges the per-period feeds into chart rows, one per requested period.
/// Periods with no data still appear, zeroed, so the chart axis is dense.
pub fn assemble_report(
    periods: &[Period],
    totals: &[PeriodTotalRow],
    categories: &[PeriodCategoryRow],
) -> ReportResponse {
    let mut category_names: Vec<String> = categories
        .iter()
        .map(|r| r.category.as_str().to_string())
        .collect();
    category_names.sort();
    category_names.dedup();

    let data = periods
        .iter()
        .map(|p| {
            let key = p.to_string();
            let total = totals
                .iter()
                .find(|r| r.period == key)
                .map(|r| r.total)
                .unwrap_or(0);
            let by_category: BTreeMap<String, i64> = categories
                .iter()
                .filter(|r| r.period == key)
                .map(|r| (r.category.as_str().to_string(), r.total))
                .collect();
            ReportRow {
                period: key,
                total,
                by_category,
            }
        })
        .collect();

    ReportResponse {
        data,
        categories: category_names,
    }
}

#[derive(Clone)]
pub struct ReportService {
    repo: DashboardRepository,
    property_id: String,
}

impl ReportService {
    pub fn new(repo: DashboardRepository, property_id: String) -> Self {
        Self { repo, property_id }
    }

    pub async fn expense_report(
        &self,
        from: Option<Period>,
        to: Option<Period>,
        months: Option<usize>,
    ) -> Result<ReportResponse, AppError> {
        let periods = report_periods(from, to, months);
        let keys: Vec<String> = periods.iter().map(Period::to_string).collect();

        let totals = self
            .repo
            .expense_totals_by_period(&self.property_id, &keys)
            .await?;
        let categories = self
            .repo
            .expense_categories_by_period(&self.property_id, &keys)
            .await?;

        Ok(assemble_report(&periods, &totals, &categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::ExpenseCategory;

    #[test]
    fn explicit_range_wins_over_months() {
        let from: Period = "2024-11".parse().unwrap();
        let to: Period = "2025-02".parse().unwrap();
        let periods = report_periods(Some(from), Some(to), Some(3));
        let keys: Vec<String> = periods.iter().map(Period::to_string).collect();
        assert_eq!(keys, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn months_window_is_capped() {
        let periods = report_periods(None, None, Some(60));
        assert_eq!(periods.len(), MAX_RANGE_MONTHS);
        let periods = report_periods(None, None, None);
        assert_eq!(periods.len(), DEFAULT_MONTHS);
    }

    #[test]
    fn rows_cover_every_period_even_without_data() {
        let periods = vec![
            "2025-01".parse().unwrap(),
            "2025-02".parse().unwrap(),
            "2025-03".parse().unwrap(),
        ];
        let totals = vec![PeriodTotalRow {
            period: "2025-02".to_string(),
            total: 300_000,
        }];
        let categories = vec![PeriodCategoryRow {
            period: "2025-02".to_string(),
            category: ExpenseCategory::Listrik,
            total: 300_000,
        }];
        let report = assemble_report(&periods, &totals, &categories);
        assert_eq!(report.data.len(), 3);
        assert_eq!(report.data[0].total, 0);
        assert!(report.data[0].by_category.is_empty());
        assert_eq!(report.data[1].total, 300_000);
        assert_eq!(report.data[1].by_category["listrik"], 300_000);
        assert_eq!(report.categories, vec!["listrik"]);
    }
}
