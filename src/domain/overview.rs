//! Monthly ledger entities: the month header, supporter donations, and distributions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{soft_deletable, Period, SoftDeletable};

/// Currencies a supporter donation can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "JPY")]
    Jpy,
    #[serde(rename = "MMK")]
    Mmk,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Mmk => "MMK",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Currency::Jpy),
            "MMK" => Ok(Currency::Mmk),
            other => Err(format!("unsupported currency `{other}` (expected JPY or MMK)")),
        }
    }
}

/// Header of one calendar month's ledger. Children live in their own tables and
/// are joined in by [`MonthLedger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverview {
    pub id: Uuid,
    pub period: Period,
    /// JPY → MMK rate in effect for the month.
    pub exchange_rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyOverview {
    pub fn new(period: Period, exchange_rate: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            period,
            exchange_rate,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupporterDonation {
    pub id: Uuid,
    pub overview_id: Uuid,
    pub name: String,
    /// Amount in the donation's original currency.
    pub amount: i64,
    pub currency: Currency,
    /// MMK equivalent of `amount`.
    pub kyat_amount: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SupporterDonation {
    pub fn new(
        overview_id: Uuid,
        name: impl Into<String>,
        amount: i64,
        currency: Currency,
        kyat_amount: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            overview_id,
            name: name.into(),
            amount,
            currency,
            kyat_amount,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub id: Uuid,
    pub overview_id: Uuid,
    pub recipient: String,
    /// Weak reference; the place may be missing or deleted later.
    #[serde(default)]
    pub donation_place_id: Option<Uuid>,
    pub amount_mmk: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DistributionRecord {
    pub fn new(overview_id: Uuid, recipient: impl Into<String>, amount_mmk: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            overview_id,
            recipient: recipient.into(),
            donation_place_id: None,
            amount_mmk,
            remarks: None,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    pub fn with_place(mut self, place_id: Option<Uuid>) -> Self {
        self.donation_place_id = place_id;
        self
    }

    pub fn with_remarks(mut self, remarks: Option<String>) -> Self {
        self.remarks = remarks;
        self
    }
}

soft_deletable!(SupporterDonation, DistributionRecord);

/// A month header together with its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthLedger {
    pub overview: MonthlyOverview,
    pub donations: Vec<SupporterDonation>,
    pub distributions: Vec<DistributionRecord>,
}

impl MonthLedger {
    pub fn empty(overview: MonthlyOverview) -> Self {
        Self {
            overview,
            donations: Vec::new(),
            distributions: Vec::new(),
        }
    }

    pub fn period(&self) -> Period {
        self.overview.period
    }

    /// Sum of kyat amounts over active donations.
    pub fn total_collected(&self) -> i128 {
        self.donations
            .iter()
            .filter(|donation| donation.is_active())
            .map(|donation| donation.kyat_amount as i128)
            .sum()
    }

    /// Sum of MMK amounts over active distributions.
    pub fn total_donated(&self) -> i128 {
        self.distributions
            .iter()
            .filter(|record| record.is_active())
            .map(|record| record.amount_mmk as i128)
            .sum()
    }

    pub fn net(&self) -> i128 {
        self.total_collected() - self.total_donated()
    }
}
