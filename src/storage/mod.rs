//! Persistence seams consumed by the services.
//!
//! The traits describe what the core needs from a store; [`SnapshotStore`] is the one
//! implementation shipped here, generic over where the snapshot is kept.

pub mod json_backend;
pub mod snapshot;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Currency, DistributionRecord, DonationPlace, MonthLedger, MonthlyOverview, Period, Role,
    SupporterDonation, User, YearlySummary,
};

pub use json_backend::JsonFile;
pub use snapshot::{
    JsonStore, MemoryStore, SnapshotBackend, SnapshotStore, StoreSnapshot, Volatile,
    SNAPSHOT_SCHEMA_VERSION,
};

pub const OVERVIEW: &str = "monthly overview";
pub const DONATION: &str = "supporter donation";
pub const DISTRIBUTION: &str = "distribution record";
pub const PLACE: &str = "donation place";
pub const USER: &str = "user";
pub const YEARLY: &str = "yearly summary";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} `{key}` not found")]
    NotFound { entity: &'static str, key: String },
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A transactional callback refused the change; nothing was committed.
    #[error("{0}")]
    Aborted(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Callback used by [`LedgerStore::update_exchange_rate_tx`] to derive a donation's new
/// kyat amount. An error aborts the whole transaction.
pub type RecomputeKyat<'a> = &'a dyn Fn(&SupporterDonation) -> StoreResult<i64>;

/// Full replacement of a donation's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationChanges {
    pub name: String,
    pub amount: i64,
    pub currency: Currency,
    pub kyat_amount: i64,
}

/// Full replacement of a distribution's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionChanges {
    pub recipient: String,
    pub donation_place_id: Option<Uuid>,
    pub amount_mmk: i64,
    pub remarks: Option<String>,
}

/// Monthly ledgers and their children.
///
/// Month lookups return only active children, ordered by creation time ascending.
/// Child lookups by id (`find_donation`, `find_distribution`) also see soft-deleted rows.
pub trait LedgerStore: Send + Sync {
    fn find_month(&self, period: Period) -> StoreResult<Option<MonthLedger>>;
    fn find_month_by_id(&self, id: Uuid) -> StoreResult<Option<MonthLedger>>;
    /// Every month strictly before `period`, oldest first.
    fn find_months_before(&self, period: Period) -> StoreResult<Vec<MonthLedger>>;
    /// Every month, oldest first.
    fn list_months(&self) -> StoreResult<Vec<MonthLedger>>;
    /// Fails with [`StoreError::Conflict`] when the period is already taken.
    fn create_month(&self, period: Period, exchange_rate: Decimal)
        -> StoreResult<MonthlyOverview>;
    /// Stores the new rate and rewrites every donation of the month with `recompute`,
    /// all or nothing.
    fn update_exchange_rate_tx(
        &self,
        id: Uuid,
        exchange_rate: Decimal,
        recompute: RecomputeKyat<'_>,
    ) -> StoreResult<MonthLedger>;

    fn find_donation(&self, id: Uuid) -> StoreResult<Option<SupporterDonation>>;
    fn create_donation(&self, donation: SupporterDonation) -> StoreResult<SupporterDonation>;
    fn update_donation(&self, id: Uuid, changes: DonationChanges)
        -> StoreResult<SupporterDonation>;
    fn soft_delete_donation(&self, id: Uuid) -> StoreResult<SupporterDonation>;
    fn restore_donation(&self, id: Uuid) -> StoreResult<SupporterDonation>;
    fn hard_delete_donation(&self, id: Uuid) -> StoreResult<()>;

    fn find_distribution(&self, id: Uuid) -> StoreResult<Option<DistributionRecord>>;
    fn create_distribution(&self, record: DistributionRecord) -> StoreResult<DistributionRecord>;
    fn update_distribution(
        &self,
        id: Uuid,
        changes: DistributionChanges,
    ) -> StoreResult<DistributionRecord>;
    fn soft_delete_distribution(&self, id: Uuid) -> StoreResult<DistributionRecord>;
    fn restore_distribution(&self, id: Uuid) -> StoreResult<DistributionRecord>;
    fn hard_delete_distribution(&self, id: Uuid) -> StoreResult<()>;
}

pub trait PlaceStore: Send + Sync {
    fn list_places(&self, include_deleted: bool) -> StoreResult<Vec<DonationPlace>>;
    fn find_place(&self, id: Uuid) -> StoreResult<Option<DonationPlace>>;
    fn create_place(&self, place: DonationPlace) -> StoreResult<DonationPlace>;
    fn rename_place(&self, id: Uuid, name: String) -> StoreResult<DonationPlace>;
    fn soft_delete_place(&self, id: Uuid) -> StoreResult<DonationPlace>;
    fn restore_place(&self, id: Uuid) -> StoreResult<DonationPlace>;
    fn hard_delete_place(&self, id: Uuid) -> StoreResult<()>;
}

pub trait UserStore: Send + Sync {
    fn list_users(&self, include_deleted: bool) -> StoreResult<Vec<User>>;
    fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    fn create_user(&self, user: User) -> StoreResult<User>;
    fn update_user_role(&self, id: Uuid, role: Role) -> StoreResult<User>;
    fn soft_delete_user(&self, id: Uuid) -> StoreResult<User>;
    fn restore_user(&self, id: Uuid) -> StoreResult<User>;
    fn hard_delete_user(&self, id: Uuid) -> StoreResult<()>;
}

/// The denormalized yearly totals table.
pub trait YearlyStore: Send + Sync {
    fn find_yearly(&self, year: i32) -> StoreResult<Option<YearlySummary>>;
    /// Ascending by year.
    fn list_yearly(&self) -> StoreResult<Vec<YearlySummary>>;
    fn upsert_yearly(&self, summary: YearlySummary) -> StoreResult<YearlySummary>;
}
