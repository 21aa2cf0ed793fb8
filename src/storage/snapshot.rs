//! Snapshot-based store: the whole dataset lives in one [`StoreSnapshot`] guarded by a
//! lock, and every write is staged on a copy before it is persisted and swapped in.

use std::{collections::HashMap, sync::RwLock};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    DistributionRecord, DonationPlace, Identifiable, MonthLedger, MonthlyOverview, Period, Role,
    SoftDeletable, SupporterDonation, User, YearlySummary,
};

use super::{
    json_backend::JsonFile, DistributionChanges, DonationChanges, LedgerStore, PlaceStore,
    RecomputeKyat, StoreError, StoreResult, UserStore, YearlyStore, DISTRIBUTION, DONATION,
    OVERVIEW, PLACE, USER,
};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Every table of the dashboard in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub months: Vec<MonthlyOverview>,
    #[serde(default)]
    pub donations: Vec<SupporterDonation>,
    #[serde(default)]
    pub distributions: Vec<DistributionRecord>,
    #[serde(default)]
    pub places: Vec<DonationPlace>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub yearly: Vec<YearlySummary>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            months: Vec::new(),
            donations: Vec::new(),
            distributions: Vec::new(),
            places: Vec::new(),
            users: Vec::new(),
            yearly: Vec::new(),
        }
    }
}

impl StoreSnapshot {
    /// Joins active children onto the selected month headers, oldest month first and
    /// children in creation order.
    fn ledgers_where(&self, keep: impl Fn(&MonthlyOverview) -> bool) -> Vec<MonthLedger> {
        let mut ledgers: Vec<MonthLedger> = self
            .months
            .iter()
            .filter(|month| keep(month))
            .cloned()
            .map(MonthLedger::empty)
            .collect();
        ledgers.sort_by_key(MonthLedger::period);

        let index: HashMap<Uuid, usize> = ledgers
            .iter()
            .enumerate()
            .map(|(idx, ledger)| (ledger.overview.id, idx))
            .collect();
        for donation in self.donations.iter().filter(|d| d.is_active()) {
            if let Some(&idx) = index.get(&donation.overview_id) {
                ledgers[idx].donations.push(donation.clone());
            }
        }
        for record in self.distributions.iter().filter(|d| d.is_active()) {
            if let Some(&idx) = index.get(&record.overview_id) {
                ledgers[idx].distributions.push(record.clone());
            }
        }
        for ledger in &mut ledgers {
            ledger.donations.sort_by_key(|d| d.created_at);
            ledger.distributions.sort_by_key(|d| d.created_at);
        }
        ledgers
    }

    fn month_mut(&mut self, id: Uuid) -> StoreResult<&mut MonthlyOverview> {
        self.months
            .iter_mut()
            .find(|month| month.id == id)
            .ok_or_else(|| StoreError::not_found(OVERVIEW, id))
    }

    fn month_exists(&self, id: Uuid) -> bool {
        self.months.iter().any(|month| month.id == id)
    }
}

fn row_mut<'a, T: Identifiable>(
    rows: &'a mut [T],
    id: Uuid,
    entity: &'static str,
) -> StoreResult<&'a mut T> {
    rows.iter_mut()
        .find(|row| row.id() == id)
        .ok_or_else(|| StoreError::not_found(entity, id))
}

fn find_row<T: Identifiable + Clone>(rows: &[T], id: Uuid) -> Option<T> {
    rows.iter().find(|row| row.id() == id).cloned()
}

fn set_deleted<T: Identifiable + SoftDeletable + Clone>(
    rows: &mut [T],
    id: Uuid,
    entity: &'static str,
    deleted: bool,
) -> StoreResult<T> {
    let row = row_mut(rows, id, entity)?;
    if deleted {
        // Removing an already removed row keeps its original deletion time.
        if row.is_active() {
            row.mark_deleted(Utc::now());
        }
    } else {
        row.restore();
    }
    Ok(row.clone())
}

fn remove_row<T: Identifiable>(rows: &mut Vec<T>, id: Uuid, entity: &'static str) -> StoreResult<()> {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    if rows.len() == before {
        return Err(StoreError::not_found(entity, id));
    }
    Ok(())
}

/// Where a [`SnapshotStore`] keeps its data between processes.
pub trait SnapshotBackend: Send + Sync {
    fn load(&self) -> StoreResult<StoreSnapshot>;
    fn persist(&self, snapshot: &StoreSnapshot) -> StoreResult<()>;
}

/// Keeps nothing; the snapshot dies with the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct Volatile;

impl SnapshotBackend for Volatile {
    fn load(&self) -> StoreResult<StoreSnapshot> {
        Ok(StoreSnapshot::default())
    }

    fn persist(&self, _snapshot: &StoreSnapshot) -> StoreResult<()> {
        Ok(())
    }
}

pub struct SnapshotStore<B> {
    backend: B,
    state: RwLock<StoreSnapshot>,
}

pub type MemoryStore = SnapshotStore<Volatile>;
pub type JsonStore = SnapshotStore<JsonFile>;

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_snapshot(StoreSnapshot::default())
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            backend: Volatile,
            state: RwLock::new(snapshot),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SnapshotBackend> SnapshotStore<B> {
    pub fn open(backend: B) -> StoreResult<Self> {
        let snapshot = backend.load()?;
        Ok(Self {
            backend,
            state: RwLock::new(snapshot),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        self.read(StoreSnapshot::clone)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreSnapshot) -> T) -> StoreResult<T> {
        let guard = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("snapshot lock poisoned".into()))?;
        Ok(f(&guard))
    }

    /// Applies `f` to a copy of the snapshot; the copy replaces the live snapshot only
    /// after `f` succeeds and the backend has persisted it.
    fn write<T>(&self, f: impl FnOnce(&mut StoreSnapshot) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("snapshot lock poisoned".into()))?;
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        self.backend.persist(&draft)?;
        *guard = draft;
        Ok(value)
    }
}

impl<B: SnapshotBackend> LedgerStore for SnapshotStore<B> {
    fn find_month(&self, period: Period) -> StoreResult<Option<MonthLedger>> {
        self.read(|s| s.ledgers_where(|month| month.period == period).pop())
    }

    fn find_month_by_id(&self, id: Uuid) -> StoreResult<Option<MonthLedger>> {
        self.read(|s| s.ledgers_where(|month| month.id == id).pop())
    }

    fn find_months_before(&self, period: Period) -> StoreResult<Vec<MonthLedger>> {
        self.read(|s| s.ledgers_where(|month| month.period < period))
    }

    fn list_months(&self) -> StoreResult<Vec<MonthLedger>> {
        self.read(|s| s.ledgers_where(|_| true))
    }

    fn create_month(
        &self,
        period: Period,
        exchange_rate: Decimal,
    ) -> StoreResult<MonthlyOverview> {
        self.write(|s| {
            if s.months.iter().any(|month| month.period == period) {
                return Err(StoreError::Conflict(format!(
                    "{OVERVIEW} for {period} already exists"
                )));
            }
            let overview = MonthlyOverview::new(period, exchange_rate);
            s.months.push(overview.clone());
            Ok(overview)
        })
    }

    fn update_exchange_rate_tx(
        &self,
        id: Uuid,
        exchange_rate: Decimal,
        recompute: RecomputeKyat<'_>,
    ) -> StoreResult<MonthLedger> {
        self.write(|s| {
            let month = s.month_mut(id)?;
            month.exchange_rate = exchange_rate;
            month.touch();
            let mut rewritten = 0usize;
            for donation in s.donations.iter_mut().filter(|d| d.overview_id == id) {
                let kyat = recompute(&*donation)?;
                if kyat != donation.kyat_amount {
                    donation.kyat_amount = kyat;
                    rewritten += 1;
                }
            }
            debug!(%id, rewritten, "exchange rate transaction staged");
            s.ledgers_where(|month| month.id == id)
                .pop()
                .ok_or_else(|| StoreError::not_found(OVERVIEW, id))
        })
    }

    fn find_donation(&self, id: Uuid) -> StoreResult<Option<SupporterDonation>> {
        self.read(|s| find_row(&s.donations, id))
    }

    fn create_donation(&self, donation: SupporterDonation) -> StoreResult<SupporterDonation> {
        self.write(|s| {
            if !s.month_exists(donation.overview_id) {
                return Err(StoreError::not_found(OVERVIEW, donation.overview_id));
            }
            s.donations.push(donation.clone());
            Ok(donation)
        })
    }

    fn update_donation(
        &self,
        id: Uuid,
        changes: DonationChanges,
    ) -> StoreResult<SupporterDonation> {
        self.write(|s| {
            let row = row_mut(&mut s.donations, id, DONATION)?;
            row.name = changes.name;
            row.amount = changes.amount;
            row.currency = changes.currency;
            row.kyat_amount = changes.kyat_amount;
            Ok(row.clone())
        })
    }

    fn soft_delete_donation(&self, id: Uuid) -> StoreResult<SupporterDonation> {
        self.write(|s| set_deleted(&mut s.donations, id, DONATION, true))
    }

    fn restore_donation(&self, id: Uuid) -> StoreResult<SupporterDonation> {
        self.write(|s| set_deleted(&mut s.donations, id, DONATION, false))
    }

    fn hard_delete_donation(&self, id: Uuid) -> StoreResult<()> {
        self.write(|s| remove_row(&mut s.donations, id, DONATION))
    }

    fn find_distribution(&self, id: Uuid) -> StoreResult<Option<DistributionRecord>> {
        self.read(|s| find_row(&s.distributions, id))
    }

    fn create_distribution(&self, record: DistributionRecord) -> StoreResult<DistributionRecord> {
        self.write(|s| {
            if !s.month_exists(record.overview_id) {
                return Err(StoreError::not_found(OVERVIEW, record.overview_id));
            }
            s.distributions.push(record.clone());
            Ok(record)
        })
    }

    fn update_distribution(
        &self,
        id: Uuid,
        changes: DistributionChanges,
    ) -> StoreResult<DistributionRecord> {
        self.write(|s| {
            let row = row_mut(&mut s.distributions, id, DISTRIBUTION)?;
            row.recipient = changes.recipient;
            row.donation_place_id = changes.donation_place_id;
            row.amount_mmk = changes.amount_mmk;
            row.remarks = changes.remarks;
            Ok(row.clone())
        })
    }

    fn soft_delete_distribution(&self, id: Uuid) -> StoreResult<DistributionRecord> {
        self.write(|s| set_deleted(&mut s.distributions, id, DISTRIBUTION, true))
    }

    fn restore_distribution(&self, id: Uuid) -> StoreResult<DistributionRecord> {
        self.write(|s| set_deleted(&mut s.distributions, id, DISTRIBUTION, false))
    }

    fn hard_delete_distribution(&self, id: Uuid) -> StoreResult<()> {
        self.write(|s| remove_row(&mut s.distributions, id, DISTRIBUTION))
    }
}

impl<B: SnapshotBackend> PlaceStore for SnapshotStore<B> {
    fn list_places(&self, include_deleted: bool) -> StoreResult<Vec<DonationPlace>> {
        self.read(|s| {
            let mut places: Vec<DonationPlace> = s
                .places
                .iter()
                .filter(|place| include_deleted || place.is_active())
                .cloned()
                .collect();
            places.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            places
        })
    }

    fn find_place(&self, id: Uuid) -> StoreResult<Option<DonationPlace>> {
        self.read(|s| find_row(&s.places, id))
    }

    fn create_place(&self, place: DonationPlace) -> StoreResult<DonationPlace> {
        self.write(|s| {
            s.places.push(place.clone());
            Ok(place)
        })
    }

    fn rename_place(&self, id: Uuid, name: String) -> StoreResult<DonationPlace> {
        self.write(|s| {
            let place = row_mut(&mut s.places, id, PLACE)?;
            place.name = name;
            place.updated_at = Utc::now();
            Ok(place.clone())
        })
    }

    fn soft_delete_place(&self, id: Uuid) -> StoreResult<DonationPlace> {
        self.write(|s| set_deleted(&mut s.places, id, PLACE, true))
    }

    fn restore_place(&self, id: Uuid) -> StoreResult<DonationPlace> {
        self.write(|s| set_deleted(&mut s.places, id, PLACE, false))
    }

    fn hard_delete_place(&self, id: Uuid) -> StoreResult<()> {
        self.write(|s| remove_row(&mut s.places, id, PLACE))
    }
}

impl<B: SnapshotBackend> UserStore for SnapshotStore<B> {
    fn list_users(&self, include_deleted: bool) -> StoreResult<Vec<User>> {
        self.read(|s| {
            let mut users: Vec<User> = s
                .users
                .iter()
                .filter(|user| include_deleted || user.is_active())
                .cloned()
                .collect();
            users.sort_by_key(|user| user.created_at);
            users
        })
    }

    fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.read(|s| find_row(&s.users, id))
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.read(|s| {
            s.users
                .iter()
                .find(|user| user.email.eq_ignore_ascii_case(email))
                .cloned()
        })
    }

    fn create_user(&self, user: User) -> StoreResult<User> {
        self.write(|s| {
            if s.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                return Err(StoreError::Conflict(format!(
                    "{USER} with email `{}` already exists",
                    user.email
                )));
            }
            s.users.push(user.clone());
            Ok(user)
        })
    }

    fn update_user_role(&self, id: Uuid, role: Role) -> StoreResult<User> {
        self.write(|s| {
            let user = row_mut(&mut s.users, id, USER)?;
            user.role = role;
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }

    fn soft_delete_user(&self, id: Uuid) -> StoreResult<User> {
        self.write(|s| set_deleted(&mut s.users, id, USER, true))
    }

    fn restore_user(&self, id: Uuid) -> StoreResult<User> {
        self.write(|s| set_deleted(&mut s.users, id, USER, false))
    }

    fn hard_delete_user(&self, id: Uuid) -> StoreResult<()> {
        self.write(|s| remove_row(&mut s.users, id, USER))
    }
}

impl<B: SnapshotBackend> YearlyStore for SnapshotStore<B> {
    fn find_yearly(&self, year: i32) -> StoreResult<Option<YearlySummary>> {
        self.read(|s| s.yearly.iter().find(|row| row.year == year).cloned())
    }

    fn list_yearly(&self) -> StoreResult<Vec<YearlySummary>> {
        self.read(|s| {
            let mut rows = s.yearly.clone();
            rows.sort_by_key(|row| row.year);
            rows
        })
    }

    fn upsert_yearly(&self, summary: YearlySummary) -> StoreResult<YearlySummary> {
        self.write(|s| {
            match s.yearly.iter_mut().find(|row| row.year == summary.year) {
                Some(existing) => *existing = summary.clone(),
                None => s.yearly.push(summary.clone()),
            }
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::domain::Currency;

    fn period(year: i64, month: i64) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn months_before_are_strictly_earlier_and_ascending() {
        let store = MemoryStore::new();
        for (year, month) in [(2025, 2), (2024, 12), (2025, 1), (2025, 3)] {
            store
                .create_month(period(year, month), Decimal::from(30))
                .unwrap();
        }
        let prior: Vec<Period> = store
            .find_months_before(period(2025, 2))
            .unwrap()
            .iter()
            .map(MonthLedger::period)
            .collect();
        assert_eq!(prior, vec![period(2024, 12), period(2025, 1)]);
    }

    #[test]
    fn duplicate_period_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_month(period(2025, 6), Decimal::from(30)).unwrap();
        let err = store
            .create_month(period(2025, 6), Decimal::from(31))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn month_lookup_hides_soft_deleted_children() {
        let store = MemoryStore::new();
        let month = store.create_month(period(2025, 5), Decimal::from(30)).unwrap();
        let kept = store
            .create_donation(SupporterDonation::new(month.id, "A", 10, Currency::Mmk, 10))
            .unwrap();
        let hidden = store
            .create_donation(SupporterDonation::new(month.id, "B", 20, Currency::Mmk, 20))
            .unwrap();
        store.soft_delete_donation(hidden.id).unwrap();

        let ledger = store.find_month(period(2025, 5)).unwrap().unwrap();
        assert_eq!(ledger.donations.len(), 1);
        assert_eq!(ledger.donations[0].id, kept.id);
        assert!(store.find_donation(hidden.id).unwrap().is_some());
    }

    #[test]
    fn repeated_removal_keeps_the_first_deletion_time() {
        let store = MemoryStore::new();
        let month = store.create_month(period(2025, 5), Decimal::from(30)).unwrap();
        let donation = store
            .create_donation(SupporterDonation::new(month.id, "A", 10, Currency::Mmk, 10))
            .unwrap();

        let first = store.soft_delete_donation(donation.id).unwrap();
        let second = store.soft_delete_donation(donation.id).unwrap();
        assert!(first.deleted_at.is_some());
        assert_eq!(second.deleted_at, first.deleted_at);

        store.restore_donation(donation.id).unwrap();
        let again = store.soft_delete_donation(donation.id).unwrap();
        assert!(again.deleted_at >= first.deleted_at);
    }

    #[test]
    fn children_require_an_existing_month() {
        let store = MemoryStore::new();
        let orphan = DistributionRecord::new(Uuid::new_v4(), "Clinic", 100);
        let err = store.create_distribution(orphan).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity, .. } if entity == OVERVIEW));
    }

    #[test]
    fn aborted_rate_transaction_leaves_snapshot_untouched() {
        let store = MemoryStore::new();
        let month = store.create_month(period(2025, 5), Decimal::from(30)).unwrap();
        for name in ["A", "B"] {
            store
                .create_donation(SupporterDonation::new(month.id, name, 100, Currency::Jpy, 3000))
                .unwrap();
        }
        let before = store.snapshot().unwrap();

        let calls = std::cell::Cell::new(0);
        let recompute = |_: &SupporterDonation| {
            calls.set(calls.get() + 1);
            if calls.get() == 2 {
                Err(StoreError::Aborted("second donation rejected".into()))
            } else {
                Ok(3500)
            }
        };
        let err = store
            .update_exchange_rate_tx(month.id, Decimal::from(35), &recompute)
            .unwrap_err();

        assert!(matches!(err, StoreError::Aborted(_)));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn failed_persist_discards_the_staged_write() {
        struct Flaky(AtomicBool);
        impl SnapshotBackend for Flaky {
            fn load(&self) -> StoreResult<StoreSnapshot> {
                Ok(StoreSnapshot::default())
            }
            fn persist(&self, _snapshot: &StoreSnapshot) -> StoreResult<()> {
                if self.0.load(Ordering::SeqCst) {
                    Err(StoreError::Unavailable("disk full".into()))
                } else {
                    Ok(())
                }
            }
        }

        let store = SnapshotStore::open(Flaky(AtomicBool::new(false))).unwrap();
        store.create_month(period(2025, 1), Decimal::from(30)).unwrap();
        store.backend().0.store(true, Ordering::SeqCst);

        assert!(store.create_month(period(2025, 2), Decimal::from(30)).is_err());
        assert_eq!(store.list_months().unwrap().len(), 1);
    }

    #[test]
    fn hard_delete_of_missing_row_reports_not_found() {
        let store = MemoryStore::new();
        let err = store.hard_delete_donation(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity, .. } if entity == DONATION));
    }
}
