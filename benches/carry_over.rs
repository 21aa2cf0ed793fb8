use criterion::{black_box, criterion_group, criterion_main, Criterion};
use donation_core::{
    core::carry_over::{balance_steps, compute_carry_over, fold_balance},
    domain::{Currency, DistributionRecord, MonthlyOverview, Period, SupporterDonation},
    storage::{JsonFile, LedgerStore, MemoryStore, SnapshotBackend, StoreSnapshot},
};
use rust_decimal::Decimal;
use tempfile::tempdir;

/// Every month from 2000-01 through 2099-12 with a handful of children each.
fn build_history() -> StoreSnapshot {
    let mut snapshot = StoreSnapshot::default();
    let rate = Decimal::new(305, 1);
    for year in 2000..2100 {
        for month in 1..=12 {
            let period = Period::new(year, month).expect("valid period");
            let overview = MonthlyOverview::new(period, rate);
            for idx in 0..10 {
                let amount = 1_000 + idx * 250;
                snapshot.donations.push(SupporterDonation::new(
                    overview.id,
                    format!("Supporter {idx}"),
                    amount,
                    Currency::Mmk,
                    amount,
                ));
            }
            for idx in 0..5 {
                snapshot
                    .distributions
                    .push(DistributionRecord::new(overview.id, format!("Recipient {idx}"), 3_000));
            }
            snapshot.months.push(overview);
        }
    }
    snapshot
}

fn bench_carry_over(c: &mut Criterion) {
    let store = MemoryStore::from_snapshot(build_history());
    let last = Period::new(2099, 12).expect("valid period");

    c.bench_function("compute_carry_over_1200_months", |b| {
        b.iter(|| {
            let balance = compute_carry_over(&store, black_box(last)).expect("carry-over");
            black_box(balance);
        })
    });

    let months = store.list_months().expect("months");
    c.bench_function("fold_balance_1200_months", |b| {
        b.iter(|| black_box(fold_balance(black_box(&months))))
    });
    c.bench_function("balance_steps_1200_months", |b| {
        b.iter(|| black_box(balance_steps(black_box(&months))))
    });
}

fn bench_json_io(c: &mut Criterion) {
    let snapshot = build_history();
    let dir = tempdir().expect("tempdir");
    let backend = JsonFile::with_backups(dir.path().join("ledger.json"), dir.path().join("backups"), 1);

    c.bench_function("snapshot_persist_1200_months", |b| {
        b.iter(|| backend.persist(&snapshot).expect("persist"))
    });

    backend.persist(&snapshot).expect("seed");
    c.bench_function("snapshot_load_1200_months", |b| {
        b.iter(|| black_box(backend.load().expect("load")))
    });
}

criterion_group!(benches, bench_carry_over, bench_json_io);
criterion_main!(benches);
