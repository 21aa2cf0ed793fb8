//! Boundary representations returned by the services.
//!
//! Every monetary field is a decimal string so large sums survive any transport
//! without passing through floating point.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    core::carry_over::BalanceStep,
    domain::{
        Currency, DistributionRecord, DonationPlace, Lifecycle, MonthLedger, MonthlyOverview,
        Role, SoftDeletable, SupporterDonation, User, YearlySummary,
    },
};

pub fn money(value: impl Into<i128>) -> String {
    value.into().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub id: Uuid,
    pub overview_id: Uuid,
    pub name: String,
    pub amount: String,
    pub currency: Currency,
    pub kyat_amount: String,
    pub status: Lifecycle,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&SupporterDonation> for DonationView {
    fn from(donation: &SupporterDonation) -> Self {
        Self {
            id: donation.id,
            overview_id: donation.overview_id,
            name: donation.name.clone(),
            amount: money(donation.amount),
            currency: donation.currency,
            kyat_amount: money(donation.kyat_amount),
            status: donation.lifecycle(),
            created_at: donation.created_at,
            deleted_at: donation.deleted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionView {
    pub id: Uuid,
    pub overview_id: Uuid,
    pub recipient: String,
    pub donation_place_id: Option<Uuid>,
    #[serde(rename = "amountMMK")]
    pub amount_mmk: String,
    pub remarks: Option<String>,
    pub status: Lifecycle,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&DistributionRecord> for DistributionView {
    fn from(record: &DistributionRecord) -> Self {
        Self {
            id: record.id,
            overview_id: record.overview_id,
            recipient: record.recipient.clone(),
            donation_place_id: record.donation_place_id,
            amount_mmk: money(record.amount_mmk),
            remarks: record.remarks.clone(),
            status: record.lifecycle(),
            created_at: record.created_at,
            deleted_at: record.deleted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOverviewView {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub exchange_rate: String,
    pub carry_over: String,
    pub total_collected: String,
    pub total_donated: String,
    pub remaining_balance: String,
    pub supporter_donations: Vec<DonationView>,
    pub distribution_records: Vec<DistributionView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyOverviewView {
    pub fn build(ledger: &MonthLedger, carry_over: i128) -> Self {
        let collected = ledger.total_collected();
        let donated = ledger.total_donated();
        let overview = &ledger.overview;
        Self {
            id: overview.id,
            year: overview.period.year,
            month: overview.period.month,
            exchange_rate: overview.exchange_rate.normalize().to_string(),
            carry_over: money(carry_over),
            total_collected: money(collected),
            total_donated: money(donated),
            remaining_balance: money(carry_over + collected - donated),
            supporter_donations: ledger.donations.iter().map(DonationView::from).collect(),
            distribution_records: ledger
                .distributions
                .iter()
                .map(DistributionView::from)
                .collect(),
            created_at: overview.created_at,
            updated_at: overview.updated_at,
        }
    }
}

/// Month header without children, used for navigation lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHeaderView {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub exchange_rate: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&MonthlyOverview> for MonthHeaderView {
    fn from(overview: &MonthlyOverview) -> Self {
        Self {
            id: overview.id,
            year: overview.period.year,
            month: overview.period.month,
            exchange_rate: overview.exchange_rate.normalize().to_string(),
            updated_at: overview.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBalanceView {
    pub year: i32,
    pub month: u32,
    pub carry_over: String,
    pub total_collected: String,
    pub total_donated: String,
    pub remaining_balance: String,
}

impl From<&BalanceStep> for MonthBalanceView {
    fn from(step: &BalanceStep) -> Self {
        Self {
            year: step.period.year,
            month: step.period.month,
            carry_over: money(step.carry_over),
            total_collected: money(step.collected),
            total_donated: money(step.donated),
            remaining_balance: money(step.closing()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummaryView {
    pub year: i32,
    pub total_collected: String,
    pub total_donated: String,
    pub balance: String,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&YearlySummary> for YearlySummaryView {
    fn from(summary: &YearlySummary) -> Self {
        Self {
            year: summary.year,
            total_collected: money(summary.total_collected),
            total_donated: money(summary.total_donated),
            balance: money(summary.balance()),
            notes: summary.notes.clone(),
            updated_at: summary.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotalView {
    pub years: usize,
    pub total_collected: String,
    pub total_donated: String,
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceView {
    pub id: Uuid,
    pub name: String,
    pub status: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl From<&DonationPlace> for PlaceView {
    fn from(place: &DonationPlace) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            status: place.lifecycle(),
            created_at: place.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: Lifecycle,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.lifecycle(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::Period;

    #[test]
    fn overview_view_emits_money_as_strings() {
        let overview = MonthlyOverview::new(Period::new(2025, 5).unwrap(), Decimal::new(3050, 2));
        let mut ledger = MonthLedger::empty(overview.clone());
        ledger.donations.push(SupporterDonation::new(
            overview.id,
            "Ma Hla",
            1000,
            Currency::Jpy,
            30_500,
        ));
        let view = MonthlyOverviewView::build(&ledger, 5);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["exchangeRate"], "30.5");
        assert_eq!(json["carryOver"], "5");
        assert_eq!(json["totalCollected"], "30500");
        assert_eq!(json["remainingBalance"], "30505");
        assert_eq!(json["supporterDonations"][0]["kyatAmount"], "30500");
        assert_eq!(json["supporterDonations"][0]["currency"], "JPY");
    }

    #[test]
    fn distribution_amount_uses_mmk_key() {
        let record = DistributionRecord::new(Uuid::new_v4(), "School", 42);
        let json = serde_json::to_value(DistributionView::from(&record)).unwrap();
        assert_eq!(json["amountMMK"], "42");
    }
}
