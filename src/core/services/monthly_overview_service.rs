//! Monthly overview orchestration: reads with recomputed carry-over, month creation,
//! the exchange-rate cascade, and the donation/distribution lifecycles.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    core::{
        carry_over::{balance_steps, compute_carry_over},
        errors::{CoreError, CoreResult, ErrorCode},
        views::{DistributionView, DonationView, MonthBalanceView, MonthHeaderView, MonthlyOverviewView},
    },
    currency::to_kyat,
    domain::{Currency, DistributionRecord, MonthLedger, Period, SupporterDonation},
    storage::{DistributionChanges, DonationChanges, LedgerStore, StoreError, DONATION},
};

use super::validation;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMonthInput {
    pub year: i64,
    pub month: i64,
    pub exchange_rate: Decimal,
    /// Accepted for compatibility with the creation form; the opening balance is always
    /// recomputed from history and this value is never stored.
    pub carry_over: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonationInput {
    pub overview_id: Uuid,
    pub name: String,
    pub amount: i64,
    pub currency: Currency,
    /// When absent the kyat amount is derived from the month's exchange rate.
    pub kyat_amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationUpdateInput {
    pub id: Uuid,
    pub name: String,
    pub amount: i64,
    pub currency: Currency,
    pub kyat_amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDistributionInput {
    pub overview_id: Uuid,
    pub recipient: String,
    pub donation_place_id: Option<Uuid>,
    pub amount_mmk: i64,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionUpdateInput {
    pub id: Uuid,
    pub recipient: String,
    pub donation_place_id: Option<Uuid>,
    pub amount_mmk: i64,
    pub remarks: Option<String>,
}

pub struct MonthlyOverviewService {
    store: Arc<dyn LedgerStore>,
}

impl MonthlyOverviewService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// The month's ledger with its opening balance recomputed from every earlier month.
    pub fn get_monthly_overview(&self, year: i64, month: i64) -> CoreResult<MonthlyOverviewView> {
        let period = validation::period(year, month)?;
        let ledger = self
            .store
            .find_month(period)?
            .ok_or(CoreError::MonthNotFound(period))?;
        let carry_over = compute_carry_over(self.store.as_ref(), period)?;
        debug!(%period, %carry_over, "monthly overview loaded");
        Ok(MonthlyOverviewView::build(&ledger, carry_over))
    }

    /// Opening balance of `(year, month)`. The month itself need not exist.
    pub fn compute_carry_over(&self, year: i64, month: i64) -> CoreResult<i128> {
        let period = validation::period(year, month)?;
        Ok(compute_carry_over(self.store.as_ref(), period)?)
    }

    /// Remaining balance of the month before `(year, month)`.
    ///
    /// Invalid input and a missing previous month both yield `"0"` instead of an error;
    /// only storage failures propagate.
    pub fn get_previous_month_balance(&self, year: i64, month: i64) -> CoreResult<String> {
        match self.previous_month_balance(year, month) {
            Ok(balance) => Ok(balance.to_string()),
            Err(err)
                if matches!(
                    err.code(),
                    Some(ErrorCode::ValidationError | ErrorCode::MonthNotFound)
                ) =>
            {
                warn!(year, month, %err, "previous month balance defaulted to zero");
                Ok("0".to_string())
            }
            Err(err) => Err(err),
        }
    }

    fn previous_month_balance(&self, year: i64, month: i64) -> CoreResult<i128> {
        let period = validation::period(year, month)?;
        let previous = period
            .previous()
            .ok_or_else(|| CoreError::validation(format!("{period} has no previous month")))?;
        let ledger = self
            .store
            .find_month(previous)?
            .ok_or(CoreError::MonthNotFound(previous))?;
        let carry_over = compute_carry_over(self.store.as_ref(), previous)?;
        Ok(carry_over + ledger.net())
    }

    /// Month headers, oldest first.
    pub fn list_months(&self) -> CoreResult<Vec<MonthHeaderView>> {
        Ok(self
            .store
            .list_months()?
            .iter()
            .map(|ledger| MonthHeaderView::from(&ledger.overview))
            .collect())
    }

    /// Opening and closing balance of every recorded month, in one pass over history.
    pub fn balance_history(&self) -> CoreResult<Vec<MonthBalanceView>> {
        let months = self.store.list_months()?;
        Ok(balance_steps(&months)
            .iter()
            .map(MonthBalanceView::from)
            .collect())
    }

    pub fn create_monthly_overview(
        &self,
        input: CreateMonthInput,
    ) -> CoreResult<MonthlyOverviewView> {
        let period = validation::period(input.year, input.month)?;
        let rate = validation::positive_rate(input.exchange_rate)?;
        let supplied_carry_over = validation::non_negative(input.carry_over, "carry-over")?;

        if self.store.find_month(period)?.is_some() {
            return Err(CoreError::DuplicateMonth(period));
        }
        let overview = self
            .store
            .create_month(period, rate)
            .map_err(|err| match err {
                StoreError::Conflict(_) => CoreError::DuplicateMonth(period),
                other => other.into(),
            })?;
        info!(%period, id = %overview.id, rate = %rate, "monthly overview created");

        let carry_over = compute_carry_over(self.store.as_ref(), period)?;
        if i128::from(supplied_carry_over) != carry_over {
            warn!(
                %period,
                supplied = supplied_carry_over,
                computed = %carry_over,
                "supplied carry-over differs from history and was ignored"
            );
        }
        Ok(MonthlyOverviewView::build(
            &MonthLedger::empty(overview),
            carry_over,
        ))
    }

    /// Stores the new rate and re-converts every JPY donation of the month in the same
    /// transaction. MMK donations keep their kyat amount.
    pub fn update_exchange_rate(
        &self,
        id: Uuid,
        new_rate: Decimal,
    ) -> CoreResult<MonthlyOverviewView> {
        let id = validation::require_id(id, "overview id")?;
        let rate = validation::positive_rate(new_rate)?;
        if self.store.find_month_by_id(id)?.is_none() {
            return Err(CoreError::OverviewNotFound(id));
        }

        let recompute = |donation: &SupporterDonation| -> Result<i64, StoreError> {
            match donation.currency {
                Currency::Mmk => Ok(donation.kyat_amount),
                Currency::Jpy => to_kyat(donation.amount, Currency::Jpy, rate)
                    .map_err(|err| StoreError::Aborted(err.to_string())),
            }
        };
        let ledger = self
            .store
            .update_exchange_rate_tx(id, rate, &recompute)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => CoreError::OverviewNotFound(id),
                other => other.into(),
            })?;

        let jpy = ledger
            .donations
            .iter()
            .filter(|donation| donation.currency == Currency::Jpy)
            .count();
        let period = ledger.period();
        info!(%period, %id, rate = %rate, jpy_donations = jpy, "exchange rate updated");
        let carry_over = compute_carry_over(self.store.as_ref(), period)?;
        Ok(MonthlyOverviewView::build(&ledger, carry_over))
    }

    pub fn add_supporter_donation(&self, input: NewDonationInput) -> CoreResult<DonationView> {
        let overview_id = validation::require_id(input.overview_id, "overview id")?;
        let name = validation::require_text(&input.name, "name")?;
        let amount = validation::non_negative(input.amount, "amount")?;
        let rate = self.rate_of(overview_id)?;
        let kyat_amount = resolve_kyat(amount, input.currency, input.kyat_amount, rate)?;

        let donation = SupporterDonation::new(overview_id, name, amount, input.currency, kyat_amount);
        let created = self
            .store
            .create_donation(donation)
            .map_err(|err| overview_missing(err, overview_id))?;
        info!(id = %created.id, %overview_id, kyat = created.kyat_amount, "supporter donation added");
        Ok(DonationView::from(&created))
    }

    pub fn update_supporter_donation(&self, input: DonationUpdateInput) -> CoreResult<DonationView> {
        let id = validation::require_id(input.id, "donation id")?;
        let name = validation::require_text(&input.name, "name")?;
        let amount = validation::non_negative(input.amount, "amount")?;
        let existing = self
            .store
            .find_donation(id)?
            .ok_or_else(|| StoreError::not_found(DONATION, id))?;
        let rate = self.rate_of(existing.overview_id)?;
        let kyat_amount = resolve_kyat(amount, input.currency, input.kyat_amount, rate)?;

        let updated = self.store.update_donation(
            id,
            DonationChanges {
                name,
                amount,
                currency: input.currency,
                kyat_amount,
            },
        )?;
        info!(%id, kyat = updated.kyat_amount, "supporter donation updated");
        Ok(DonationView::from(&updated))
    }

    pub fn remove_supporter_donation(&self, id: Uuid) -> CoreResult<DonationView> {
        let id = validation::require_id(id, "donation id")?;
        let removed = self.store.soft_delete_donation(id)?;
        info!(%id, "supporter donation removed");
        Ok(DonationView::from(&removed))
    }

    pub fn restore_supporter_donation(&self, id: Uuid) -> CoreResult<DonationView> {
        let id = validation::require_id(id, "donation id")?;
        let restored = self.store.restore_donation(id)?;
        info!(%id, "supporter donation restored");
        Ok(DonationView::from(&restored))
    }

    /// Irreversible. Works on active and removed donations alike and relies on the
    /// store to report a missing row.
    pub fn purge_supporter_donation(&self, id: Uuid) -> CoreResult<()> {
        let id = validation::require_id(id, "donation id")?;
        self.store.hard_delete_donation(id)?;
        info!(%id, "supporter donation purged");
        Ok(())
    }

    pub fn add_distribution_record(
        &self,
        input: NewDistributionInput,
    ) -> CoreResult<DistributionView> {
        let overview_id = validation::require_id(input.overview_id, "overview id")?;
        let recipient = validation::require_text(&input.recipient, "recipient")?;
        let amount_mmk = validation::non_negative(input.amount_mmk, "amount")?;
        let place_id = input
            .donation_place_id
            .map(|id| validation::require_id(id, "donation place id"))
            .transpose()?;

        let record = DistributionRecord::new(overview_id, recipient, amount_mmk)
            .with_place(place_id)
            .with_remarks(validation::optional_text(input.remarks));
        let created = self
            .store
            .create_distribution(record)
            .map_err(|err| overview_missing(err, overview_id))?;
        info!(id = %created.id, %overview_id, amount = created.amount_mmk, "distribution record added");
        Ok(DistributionView::from(&created))
    }

    pub fn update_distribution_record(
        &self,
        input: DistributionUpdateInput,
    ) -> CoreResult<DistributionView> {
        let id = validation::require_id(input.id, "distribution id")?;
        let recipient = validation::require_text(&input.recipient, "recipient")?;
        let amount_mmk = validation::non_negative(input.amount_mmk, "amount")?;
        let donation_place_id = input
            .donation_place_id
            .map(|id| validation::require_id(id, "donation place id"))
            .transpose()?;

        let updated = self.store.update_distribution(
            id,
            DistributionChanges {
                recipient,
                donation_place_id,
                amount_mmk,
                remarks: validation::optional_text(input.remarks),
            },
        )?;
        info!(%id, amount = updated.amount_mmk, "distribution record updated");
        Ok(DistributionView::from(&updated))
    }

    pub fn remove_distribution_record(&self, id: Uuid) -> CoreResult<DistributionView> {
        let id = validation::require_id(id, "distribution id")?;
        let removed = self.store.soft_delete_distribution(id)?;
        info!(%id, "distribution record removed");
        Ok(DistributionView::from(&removed))
    }

    pub fn restore_distribution_record(&self, id: Uuid) -> CoreResult<DistributionView> {
        let id = validation::require_id(id, "distribution id")?;
        let restored = self.store.restore_distribution(id)?;
        info!(%id, "distribution record restored");
        Ok(DistributionView::from(&restored))
    }

    /// Irreversible; see [`Self::purge_supporter_donation`].
    pub fn purge_distribution_record(&self, id: Uuid) -> CoreResult<()> {
        let id = validation::require_id(id, "distribution id")?;
        self.store.hard_delete_distribution(id)?;
        info!(%id, "distribution record purged");
        Ok(())
    }

    /// Resolves a month by period; used by callers that address months by calendar
    /// rather than id.
    pub fn overview_id_for(&self, year: i64, month: i64) -> CoreResult<Uuid> {
        let period: Period = validation::period(year, month)?;
        self.store
            .find_month(period)?
            .map(|ledger| ledger.overview.id)
            .ok_or(CoreError::MonthNotFound(period))
    }

    fn rate_of(&self, overview_id: Uuid) -> CoreResult<Decimal> {
        self.store
            .find_month_by_id(overview_id)?
            .map(|ledger| ledger.overview.exchange_rate)
            .ok_or(CoreError::OverviewNotFound(overview_id))
    }
}

/// MMK donations are worth their amount; a conflicting caller value is rejected.
/// JPY donations take the caller's kyat amount when given, else the converted one.
fn resolve_kyat(
    amount: i64,
    currency: Currency,
    supplied: Option<i64>,
    rate: Decimal,
) -> CoreResult<i64> {
    let supplied = supplied
        .map(|kyat| validation::non_negative(kyat, "kyat amount"))
        .transpose()?;
    match (currency, supplied) {
        (Currency::Mmk, Some(kyat)) if kyat != amount => Err(CoreError::validation(format!(
            "kyat amount {kyat} must equal the MMK amount {amount}"
        ))),
        (Currency::Mmk, _) => Ok(amount),
        (Currency::Jpy, Some(kyat)) => Ok(kyat),
        (Currency::Jpy, None) => Ok(to_kyat(amount, Currency::Jpy, rate)?),
    }
}

fn overview_missing(err: StoreError, overview_id: Uuid) -> CoreError {
    match err {
        StoreError::NotFound { .. } => CoreError::OverviewNotFound(overview_id),
        other => other.into(),
    }
}
