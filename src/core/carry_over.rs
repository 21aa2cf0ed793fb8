//! Carry-over engine: the opening balance of a month is the running balance of every
//! strictly earlier month, recomputed from the full history on each call.
//!
//! Nothing here is cached. Editing an old month therefore shows up in every later
//! month's opening balance on the next read. The store reads are not isolated from
//! concurrent writers: an edit to an old month that lands while a fold is in flight may
//! or may not be reflected in that fold's result, and will be on the next read.

use tracing::debug;

use crate::{
    domain::{MonthLedger, Period},
    storage::{LedgerStore, StoreResult},
};

/// One month's position in the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceStep {
    pub period: Period,
    pub carry_over: i128,
    pub collected: i128,
    pub donated: i128,
}

impl BalanceStep {
    pub fn closing(&self) -> i128 {
        self.carry_over + self.collected - self.donated
    }
}

/// Folds `collected - donated` over `months` left to right, starting from zero.
/// Soft-deleted children never count. The result is not clamped and may be negative.
pub fn fold_balance<'a, I>(months: I) -> i128
where
    I: IntoIterator<Item = &'a MonthLedger>,
{
    months
        .into_iter()
        .fold(0i128, |running, month| running + month.net())
}

/// Running balance across `months` (which must be in chronological order), one step
/// per month.
pub fn balance_steps<'a, I>(months: I) -> Vec<BalanceStep>
where
    I: IntoIterator<Item = &'a MonthLedger>,
{
    months
        .into_iter()
        .scan(0i128, |running, month| {
            let step = BalanceStep {
                period: month.period(),
                carry_over: *running,
                collected: month.total_collected(),
                donated: month.total_donated(),
            };
            *running = step.closing();
            Some(step)
        })
        .collect()
}

/// Opening balance of `period`: the fold of every month the store holds before it.
pub fn compute_carry_over(store: &dyn LedgerStore, period: Period) -> StoreResult<i128> {
    let prior = store.find_months_before(period)?;
    if prior.is_empty() {
        debug!(%period, "no prior months, carry-over is zero");
        return Ok(0);
    }
    let balance = fold_balance(prior.iter().filter(|month| month.period() < period));
    debug!(%period, months = prior.len(), %balance, "carry-over folded");
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{
        Currency, DistributionRecord, MonthlyOverview, SoftDeletable, SupporterDonation,
    };

    fn ledger(year: i64, month: i64, collected: &[i64], donated: &[i64]) -> MonthLedger {
        let overview = MonthlyOverview::new(Period::new(year, month).unwrap(), Decimal::from(30));
        let id = overview.id;
        let mut ledger = MonthLedger::empty(overview);
        for amount in collected {
            ledger
                .donations
                .push(SupporterDonation::new(id, "donor", *amount, Currency::Mmk, *amount));
        }
        for amount in donated {
            ledger
                .distributions
                .push(DistributionRecord::new(id, "recipient", *amount));
        }
        ledger
    }

    #[test]
    fn empty_history_folds_to_zero() {
        assert_eq!(fold_balance(&Vec::<MonthLedger>::new()), 0);
    }

    #[test]
    fn fold_accumulates_net_of_each_month() {
        let months = vec![
            ledger(2025, 1, &[100, 50], &[30]),
            ledger(2025, 2, &[0], &[200]),
            ledger(2025, 3, &[500], &[]),
        ];
        assert_eq!(fold_balance(&months), 120 - 200 + 500);
    }

    #[test]
    fn balance_may_go_negative() {
        let months = vec![ledger(2025, 1, &[10], &[400])];
        assert_eq!(fold_balance(&months), -390);
    }

    #[test]
    fn soft_deleted_children_are_ignored() {
        let mut month = ledger(2025, 1, &[1000], &[300]);
        month.distributions[0].mark_deleted(Utc::now());
        assert_eq!(fold_balance(std::iter::once(&month)), 1000);
    }

    #[test]
    fn steps_chain_closing_into_next_opening() {
        let months = vec![
            ledger(2024, 12, &[300_000], &[100_000]),
            ledger(2025, 1, &[50_000], &[120_000]),
        ];
        let steps = balance_steps(&months);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].carry_over, 0);
        assert_eq!(steps[0].closing(), 200_000);
        assert_eq!(steps[1].carry_over, 200_000);
        assert_eq!(steps[1].closing(), 130_000);
        assert_eq!(fold_balance(&months), steps[1].closing());
    }
}
