mod common;

use common::{create_month, open_json_store, temp_base};
use donation_core::{
    core::services::{
        MonthlyOverviewService, NewDistributionInput, NewUserInput, YearlySummaryInput,
    },
    domain::{Lifecycle, Role},
    DonationPlaceService, ErrorCode, UserService, YearlySummaryService,
};

#[test]
fn place_reference_is_weak() {
    let base = temp_base();
    let store = open_json_store(&base);
    let places = DonationPlaceService::new(store.clone());
    let months = MonthlyOverviewService::new(store.clone());

    let clinic = places.create("Hlaing Clinic").unwrap();
    let month = create_month(&months, 2025, 2, "30");
    months
        .add_distribution_record(NewDistributionInput {
            overview_id: month,
            recipient: "Clinic staff".into(),
            donation_place_id: Some(clinic.id),
            amount_mmk: 70_000,
            remarks: Some("  medicine  ".into()),
        })
        .unwrap();

    places.purge(clinic.id).unwrap();
    let view = months.get_monthly_overview(2025, 2).unwrap();
    assert_eq!(view.distribution_records[0].donation_place_id, Some(clinic.id));
    assert_eq!(view.distribution_records[0].remarks.as_deref(), Some("medicine"));
    assert_eq!(view.total_donated, "70000");
}

#[test]
fn place_lifecycle_persists() {
    let base = temp_base();
    let id = {
        let places = DonationPlaceService::new(open_json_store(&base));
        let place = places.create("Monastery").unwrap();
        places.rename(place.id, "Shwe Monastery").unwrap();
        places.remove(place.id).unwrap();
        place.id
    };

    let places = DonationPlaceService::new(open_json_store(&base));
    let all = places.list(true).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Shwe Monastery");
    assert_eq!(all[0].status, Lifecycle::SoftDeleted);
    assert_eq!(places.restore(id).unwrap().status, Lifecycle::Active);
}

#[test]
fn users_are_unique_by_email() {
    let base = temp_base();
    let users = UserService::new(open_json_store(&base));
    let admin = users
        .create(NewUserInput {
            name: "Thida".into(),
            email: "thida@example.org".into(),
            role: Role::Admin,
        })
        .unwrap();
    let err = users
        .create(NewUserInput {
            name: "Another Thida".into(),
            email: "THIDA@example.org".into(),
            role: Role::Viewer,
        })
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DuplicateRecord));

    assert_eq!(
        users.change_role(admin.id, Role::Viewer).unwrap().role,
        Role::Viewer
    );
    assert_eq!(
        users.purge(uuid::Uuid::new_v4()).unwrap_err().code(),
        Some(ErrorCode::RecordNotFound)
    );
}

#[test]
fn yearly_table_is_independent_of_monthly_ledgers() {
    let base = temp_base();
    let store = open_json_store(&base);
    let months = MonthlyOverviewService::new(store.clone());
    let yearly = YearlySummaryService::new(store.clone());
    create_month(&months, 2024, 1, "30");

    yearly
        .upsert(YearlySummaryInput {
            year: 2024,
            total_collected: 5_000_000,
            total_donated: 4_250_000,
            notes: Some("audited".into()),
        })
        .unwrap();
    yearly
        .upsert(YearlySummaryInput {
            year: 2023,
            total_collected: 1_000_000,
            total_donated: 1_000_000,
            notes: None,
        })
        .unwrap();

    let listed: Vec<i32> = yearly.list().unwrap().iter().map(|y| y.year).collect();
    assert_eq!(listed, vec![2023, 2024]);
    let year = yearly.get(2024).unwrap();
    assert_eq!(year.balance, "750000");
    assert_eq!(year.notes.as_deref(), Some("audited"));

    let total = yearly.grand_total().unwrap();
    assert_eq!(total.total_collected, "6000000");
    assert_eq!(total.balance, "750000");
}
