use std::sync::Arc;

use tracing::info;

use crate::{
    core::{
        errors::{CoreError, CoreResult},
        views::{money, GrandTotalView, YearlySummaryView},
    },
    domain::{YearlySummary, MAX_YEAR, MIN_YEAR},
    storage::{YearlyStore, YEARLY},
};

use super::validation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlySummaryInput {
    pub year: i64,
    pub total_collected: i64,
    pub total_donated: i64,
    pub notes: Option<String>,
}

/// Reads and maintains the yearly totals table. The figures are entered by
/// administrators and are independent of the monthly ledgers.
pub struct YearlySummaryService {
    store: Arc<dyn YearlyStore>,
}

impl YearlySummaryService {
    pub fn new(store: Arc<dyn YearlyStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, year: i64) -> CoreResult<YearlySummaryView> {
        let year = checked_year(year)?;
        self.store
            .find_yearly(year)?
            .map(|summary| YearlySummaryView::from(&summary))
            .ok_or_else(|| CoreError::RecordNotFound {
                entity: YEARLY,
                key: year.to_string(),
            })
    }

    pub fn list(&self) -> CoreResult<Vec<YearlySummaryView>> {
        Ok(self
            .store
            .list_yearly()?
            .iter()
            .map(YearlySummaryView::from)
            .collect())
    }

    pub fn upsert(&self, input: YearlySummaryInput) -> CoreResult<YearlySummaryView> {
        let year = checked_year(input.year)?;
        let collected = validation::non_negative(input.total_collected, "total collected")?;
        let donated = validation::non_negative(input.total_donated, "total donated")?;

        let mut summary = YearlySummary::new(year, collected, donated);
        summary.notes = validation::optional_text(input.notes);
        let stored = self.store.upsert_yearly(summary)?;
        info!(year, collected, donated, "yearly summary saved");
        Ok(YearlySummaryView::from(&stored))
    }

    pub fn grand_total(&self) -> CoreResult<GrandTotalView> {
        let rows = self.store.list_yearly()?;
        let (collected, donated) = rows.iter().fold((0i128, 0i128), |(c, d), row| {
            (c + i128::from(row.total_collected), d + i128::from(row.total_donated))
        });
        Ok(GrandTotalView {
            years: rows.len(),
            total_collected: money(collected),
            total_donated: money(donated),
            balance: money(collected - donated),
        })
    }
}

fn checked_year(year: i64) -> CoreResult<i32> {
    if (i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        Ok(year as i32)
    } else {
        Err(CoreError::validation(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::errors::ErrorCode, storage::MemoryStore};

    fn service() -> YearlySummaryService {
        YearlySummaryService::new(Arc::new(MemoryStore::new()))
    }

    fn row(year: i64, collected: i64, donated: i64) -> YearlySummaryInput {
        YearlySummaryInput {
            year,
            total_collected: collected,
            total_donated: donated,
            notes: None,
        }
    }

    #[test]
    fn upsert_replaces_existing_year() {
        let service = service();
        service.upsert(row(2024, 100, 40)).unwrap();
        let updated = service.upsert(row(2024, 150, 40)).unwrap();
        assert_eq!(updated.balance, "110");
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn grand_total_spans_all_years() {
        let service = service();
        service.upsert(row(2023, 1_000, 200)).unwrap();
        service.upsert(row(2024, 500, 900)).unwrap();
        let total = service.grand_total().unwrap();
        assert_eq!(total.years, 2);
        assert_eq!(total.total_collected, "1500");
        assert_eq!(total.balance, "400");
    }

    #[test]
    fn missing_year_is_record_not_found() {
        let err = service().get(2030).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::RecordNotFound));
    }

    #[test]
    fn out_of_range_year_and_negative_totals_are_rejected() {
        let service = service();
        assert_eq!(
            service.upsert(row(1999, 1, 1)).unwrap_err().code(),
            Some(ErrorCode::ValidationError)
        );
        assert_eq!(
            service.upsert(row(2024, -1, 0)).unwrap_err().code(),
            Some(ErrorCode::ValidationError)
        );
    }
}
