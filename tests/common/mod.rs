#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use donation_core::{
    core::services::{
        CreateMonthInput, MonthlyOverviewService, NewDistributionInput, NewDonationInput,
    },
    domain::Currency,
    storage::{JsonFile, JsonStore, MemoryStore},
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn memory_service() -> MonthlyOverviewService {
    MonthlyOverviewService::new(Arc::new(MemoryStore::new()))
}

pub fn open_json_store(base: &std::path::Path) -> Arc<JsonStore> {
    let backend = JsonFile::new(base.join("data").join("ledger.json"));
    Arc::new(JsonStore::open(backend).expect("open json store"))
}

pub fn rate(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

pub fn create_month(service: &MonthlyOverviewService, year: i64, month: i64, rate: &str) -> Uuid {
    service
        .create_monthly_overview(CreateMonthInput {
            year,
            month,
            exchange_rate: self::rate(rate),
            carry_over: 0,
        })
        .expect("create month")
        .id
}

pub fn donate(
    service: &MonthlyOverviewService,
    overview_id: Uuid,
    name: &str,
    amount: i64,
    currency: Currency,
) -> Uuid {
    service
        .add_supporter_donation(NewDonationInput {
            overview_id,
            name: name.into(),
            amount,
            currency,
            kyat_amount: None,
        })
        .expect("add donation")
        .id
}

pub fn distribute(service: &MonthlyOverviewService, overview_id: Uuid, amount_mmk: i64) -> Uuid {
    service
        .add_distribution_record(NewDistributionInput {
            overview_id,
            recipient: "Village school".into(),
            donation_place_id: None,
            amount_mmk,
            remarks: None,
        })
        .expect("add distribution")
        .id
}
