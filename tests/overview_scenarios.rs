mod common;

use common::{create_month, distribute, donate, memory_service, rate};
use donation_core::{
    core::services::{
        CreateMonthInput, DistributionUpdateInput, DonationUpdateInput, NewDonationInput,
    },
    domain::Currency,
    ErrorCode,
};
use uuid::Uuid;

#[test]
fn first_month_has_zero_carry_over_and_string_totals() {
    let service = memory_service();
    let may = create_month(&service, 2025, 5, "30");
    donate(&service, may, "Ko Aung", 200_000, Currency::Mmk);
    donate(&service, may, "Tanaka", 100, Currency::Mmk);
    donate(&service, may, "Sato", 3_330, Currency::Jpy); // 99,900 kyat
    distribute(&service, may, 60_000);
    distribute(&service, may, 40_000);

    let view = service.get_monthly_overview(2025, 5).unwrap();
    assert_eq!(view.carry_over, "0");
    assert_eq!(view.total_collected, "300000");
    assert_eq!(view.total_donated, "100000");
    assert_eq!(view.remaining_balance, "200000");
}

#[test]
fn following_month_carries_the_remaining_balance() {
    let service = memory_service();
    let may = create_month(&service, 2025, 5, "30");
    donate(&service, may, "Ko Aung", 300_000, Currency::Mmk);
    distribute(&service, may, 100_000);
    create_month(&service, 2025, 6, "30");

    assert_eq!(service.compute_carry_over(2025, 6).unwrap(), 200_000);
    let june = service.get_monthly_overview(2025, 6).unwrap();
    assert_eq!(june.carry_over, "200000");
    assert_eq!(june.remaining_balance, "200000");
}

#[test]
fn carry_over_folds_across_year_boundary_and_may_go_negative() {
    let service = memory_service();
    let nov = create_month(&service, 2024, 11, "30");
    let dec = create_month(&service, 2024, 12, "30");
    let jan = create_month(&service, 2025, 1, "30");
    donate(&service, nov, "A", 50_000, Currency::Mmk);
    distribute(&service, dec, 80_000);
    donate(&service, jan, "B", 1_000, Currency::Mmk);

    assert_eq!(service.compute_carry_over(2024, 11).unwrap(), 0);
    assert_eq!(service.compute_carry_over(2025, 1).unwrap(), -30_000);
    assert_eq!(service.compute_carry_over(2025, 2).unwrap(), -29_000);
    assert_eq!(service.get_previous_month_balance(2025, 2).unwrap(), "-29000");
}

#[test]
fn retroactive_edit_changes_every_later_month() {
    let service = memory_service();
    let march = create_month(&service, 2025, 3, "30");
    create_month(&service, 2025, 4, "30");
    create_month(&service, 2025, 5, "30");
    let donation = donate(&service, march, "Daw Hla", 10_000, Currency::Mmk);
    assert_eq!(service.compute_carry_over(2025, 5).unwrap(), 10_000);

    service
        .update_supporter_donation(DonationUpdateInput {
            id: donation,
            name: "Daw Hla".into(),
            amount: 25_000,
            currency: Currency::Mmk,
            kyat_amount: None,
        })
        .unwrap();
    assert_eq!(service.compute_carry_over(2025, 4).unwrap(), 25_000);
    assert_eq!(service.compute_carry_over(2025, 5).unwrap(), 25_000);
}

#[test]
fn creating_the_same_month_twice_is_a_duplicate() {
    let service = memory_service();
    create_month(&service, 2025, 6, "30");
    let err = service
        .create_monthly_overview(CreateMonthInput {
            year: 2025,
            month: 6,
            exchange_rate: rate("31"),
            carry_over: 0,
        })
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::DuplicateMonth));
}

#[test]
fn create_validates_its_input() {
    let service = memory_service();
    let cases = [
        (1999, 1, "30", 0),
        (2025, 13, "30", 0),
        (2025, 1, "0", 0),
        (2025, 1, "-2.5", 0),
        (2025, 1, "30", -1),
    ];
    for (year, month, exchange_rate, carry_over) in cases {
        let err = service
            .create_monthly_overview(CreateMonthInput {
                year,
                month,
                exchange_rate: rate(exchange_rate),
                carry_over,
            })
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationError), "{year}-{month}");
    }
}

#[test]
fn fresh_month_reports_zero_totals() {
    let service = memory_service();
    let view = service
        .create_monthly_overview(CreateMonthInput {
            year: 2025,
            month: 2,
            exchange_rate: rate("28.5"),
            carry_over: 999,
        })
        .unwrap();
    assert_eq!(view.total_collected, "0");
    assert_eq!(view.total_donated, "0");
    assert_eq!(view.carry_over, "0");
    assert_eq!(view.remaining_balance, view.carry_over);
    assert_eq!(view.exchange_rate, "28.5");
    assert!(view.supporter_donations.is_empty());
}

#[test]
fn missing_month_is_reported() {
    let service = memory_service();
    let err = service.get_monthly_overview(2025, 7).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MonthNotFound));
    let err = service.get_monthly_overview(2025, 0).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ValidationError));
}

#[test]
fn previous_month_balance_defaults_to_zero() {
    let service = memory_service();
    assert_eq!(service.get_previous_month_balance(2025, 1).unwrap(), "0");
    assert_eq!(service.get_previous_month_balance(2025, 99).unwrap(), "0");
    assert_eq!(service.get_previous_month_balance(1800, 1).unwrap(), "0");

    let dec = create_month(&service, 2024, 12, "30");
    donate(&service, dec, "Ma Su", 12_345, Currency::Mmk);
    assert_eq!(service.get_previous_month_balance(2025, 1).unwrap(), "12345");
}

#[test]
fn exchange_rate_cascade_reconverts_only_jpy() {
    let service = memory_service();
    let month = create_month(&service, 2025, 8, "30");
    donate(&service, month, "Suzuki", 1_000, Currency::Jpy);
    donate(&service, month, "U Ba", 5_000, Currency::Mmk);

    let before = service.get_monthly_overview(2025, 8).unwrap();
    assert_eq!(before.total_collected, "35000");

    let after = service.update_exchange_rate(month, rate("35")).unwrap();
    let jpy = after
        .supporter_donations
        .iter()
        .find(|d| d.currency == Currency::Jpy)
        .unwrap();
    let mmk = after
        .supporter_donations
        .iter()
        .find(|d| d.currency == Currency::Mmk)
        .unwrap();
    assert_eq!(jpy.kyat_amount, "35000");
    assert_eq!(mmk.kyat_amount, "5000");
    assert_eq!(after.exchange_rate, "35");

    let again = service.update_exchange_rate(month, rate("35")).unwrap();
    assert_eq!(again.total_collected, after.total_collected);
}

#[test]
fn exchange_rate_cascade_rounds_half_up() {
    let service = memory_service();
    let month = create_month(&service, 2025, 9, "30");
    donate(&service, month, "Ito", 3, Currency::Jpy);
    let view = service.update_exchange_rate(month, rate("14.5")).unwrap();
    assert_eq!(view.supporter_donations[0].kyat_amount, "44"); // 43.5 rounds up
}

#[test]
fn exchange_rate_update_errors() {
    let service = memory_service();
    let month = create_month(&service, 2025, 10, "30");
    assert_eq!(
        service
            .update_exchange_rate(Uuid::new_v4(), rate("31"))
            .unwrap_err()
            .code(),
        Some(ErrorCode::OverviewNotFound)
    );
    assert_eq!(
        service.update_exchange_rate(month, rate("0")).unwrap_err().code(),
        Some(ErrorCode::ValidationError)
    );
}

#[test]
fn removed_children_leave_totals_until_restored() {
    let service = memory_service();
    let month = create_month(&service, 2025, 4, "30");
    let donation = donate(&service, month, "Nyein", 40_000, Currency::Mmk);
    let record = distribute(&service, month, 15_000);

    service.remove_supporter_donation(donation).unwrap();
    service.remove_distribution_record(record).unwrap();
    let hidden = service.get_monthly_overview(2025, 4).unwrap();
    assert_eq!(hidden.total_collected, "0");
    assert_eq!(hidden.total_donated, "0");
    assert!(hidden.supporter_donations.is_empty());

    service.restore_supporter_donation(donation).unwrap();
    service.restore_distribution_record(record).unwrap();
    let shown = service.get_monthly_overview(2025, 4).unwrap();
    assert_eq!(shown.total_collected, "40000");
    assert_eq!(shown.total_donated, "15000");
}

#[test]
fn purge_works_from_active_and_removed_states() {
    let service = memory_service();
    let month = create_month(&service, 2025, 3, "30");
    let active = donate(&service, month, "A", 1, Currency::Mmk);
    let removed = distribute(&service, month, 1);
    service.remove_distribution_record(removed).unwrap();

    service.purge_supporter_donation(active).unwrap();
    service.purge_distribution_record(removed).unwrap();

    assert_eq!(
        service.restore_supporter_donation(active).unwrap_err().code(),
        Some(ErrorCode::RecordNotFound)
    );
    assert_eq!(
        service.purge_distribution_record(removed).unwrap_err().code(),
        Some(ErrorCode::RecordNotFound)
    );
}

#[test]
fn child_operations_validate_ids_and_report_missing_rows() {
    let service = memory_service();
    assert_eq!(
        service.remove_supporter_donation(Uuid::nil()).unwrap_err().code(),
        Some(ErrorCode::ValidationError)
    );
    assert_eq!(
        service
            .remove_distribution_record(Uuid::new_v4())
            .unwrap_err()
            .code(),
        Some(ErrorCode::RecordNotFound)
    );
    assert_eq!(
        service
            .update_supporter_donation(DonationUpdateInput {
                id: Uuid::new_v4(),
                name: "Ghost".into(),
                amount: 1,
                currency: Currency::Mmk,
                kyat_amount: None,
            })
            .unwrap_err()
            .code(),
        Some(ErrorCode::RecordNotFound)
    );
}

#[test]
fn distribution_update_changes_totals_and_trims_text() {
    let service = memory_service();
    let month = create_month(&service, 2025, 8, "30");
    let record = distribute(&service, month, 100);

    let updated = service
        .update_distribution_record(DistributionUpdateInput {
            id: record,
            recipient: "  Monastery clinic ".into(),
            donation_place_id: None,
            amount_mmk: 250,
            remarks: Some("   ".into()),
        })
        .unwrap();
    assert_eq!(updated.recipient, "Monastery clinic");
    assert_eq!(updated.amount_mmk, "250");
    assert_eq!(updated.remarks, None);

    let overview = service.get_monthly_overview(2025, 8).unwrap();
    assert_eq!(overview.total_donated, "250");
    assert_eq!(overview.remaining_balance, "-250");

    let missing = service
        .update_distribution_record(DistributionUpdateInput {
            id: Uuid::new_v4(),
            recipient: "Nobody".into(),
            donation_place_id: None,
            amount_mmk: 1,
            remarks: None,
        })
        .unwrap_err();
    assert_eq!(missing.code(), Some(ErrorCode::RecordNotFound));
}

#[test]
fn donation_kyat_follows_currency() {
    let service = memory_service();
    let month = create_month(&service, 2025, 11, "28.123");
    let jpy = service
        .add_supporter_donation(NewDonationInput {
            overview_id: month,
            name: "Kimura".into(),
            amount: 777,
            currency: Currency::Jpy,
            kyat_amount: None,
        })
        .unwrap();
    assert_eq!(jpy.kyat_amount, "21852");
    assert_eq!(jpy.amount, "777");

    let err = service
        .add_supporter_donation(NewDonationInput {
            overview_id: month,
            name: "U Tin".into(),
            amount: 500,
            currency: Currency::Mmk,
            kyat_amount: Some(600),
        })
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::ValidationError));
}

#[test]
fn balance_history_lists_running_balance() {
    let service = memory_service();
    let jan = create_month(&service, 2025, 1, "30");
    let feb = create_month(&service, 2025, 2, "30");
    donate(&service, jan, "A", 10, Currency::Mmk);
    distribute(&service, feb, 4);

    let history = service.balance_history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].remaining_balance, "10");
    assert_eq!(history[1].carry_over, "10");
    assert_eq!(history[1].remaining_balance, "6");

    let months: Vec<(i32, u32)> = service
        .list_months()
        .unwrap()
        .into_iter()
        .map(|m| (m.year, m.month))
        .collect();
    assert_eq!(months, vec![(2025, 1), (2025, 2)]);
}

#[test]
fn overview_serializes_money_as_strings() {
    let service = memory_service();
    let month = create_month(&service, 2025, 12, "30");
    donate(&service, month, "Kyaw", 1_500, Currency::Mmk);
    distribute(&service, month, 500);
    let view = service.get_monthly_overview(2025, 12).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["totalCollected"], "1500");
    assert_eq!(json["remainingBalance"], "1000");
    assert_eq!(json["supporterDonations"][0]["kyatAmount"], "1500");
    assert_eq!(json["distributionRecords"][0]["amountMMK"], "500");
    assert_eq!(json["supporterDonations"][0]["currency"], "MMK");
}
