use rust_decimal::Decimal;

use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output::{self, Table},
        registry::CommandEntry,
    },
    core::{
        services::{validation, CreateMonthInput},
        views::MonthlyOverviewView,
    },
    currency::format_kyat_str,
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "month-new",
            "Create a monthly overview",
            "month-new <year> <month> [exchange-rate] [carry-over]",
            cmd_month_new,
        ),
        CommandEntry::new(
            "month-show",
            "Show a month with its donations and distributions",
            "month-show <year> <month>",
            cmd_month_show,
        ),
        CommandEntry::new("month-list", "List recorded months", "month-list", cmd_month_list),
        CommandEntry::new(
            "month-history",
            "Running balance across every month",
            "month-history",
            cmd_month_history,
        ),
        CommandEntry::new(
            "prev-balance",
            "Remaining balance of the month before the given one",
            "prev-balance <year> <month>",
            cmd_prev_balance,
        ),
        CommandEntry::new(
            "rate-set",
            "Change a month's JPY exchange rate and re-convert its donations",
            "rate-set <year> <month> <exchange-rate>",
            cmd_rate_set,
        ),
    ]
}

fn cmd_month_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "month-new <year> <month> [exchange-rate] [carry-over]";
    args::require(args, 2, USAGE)?;
    let year = validation::parse_integer(args[0], "year")?;
    let month = validation::parse_integer(args[1], "month")?;
    let exchange_rate = match args.get(2) {
        Some(raw) => validation::parse_rate(raw)?,
        None => context.config.default_exchange_rate.ok_or_else(|| {
            CommandError::InvalidArguments(
                "No exchange rate given and no `default_exchange_rate` configured".into(),
            )
        })?,
    };
    let carry_over = match args.get(3) {
        Some(raw) => validation::parse_amount(raw, "carry-over")?,
        None => 0,
    };

    let view = context.months.create_monthly_overview(CreateMonthInput {
        year,
        month,
        exchange_rate,
        carry_over,
    })?;
    output::success(format!(
        "Monthly overview {:04}-{:02} created (id {}).",
        view.year, view.month, view.id
    ));
    print_overview(&view);
    Ok(())
}

fn cmd_month_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 2, "month-show <year> <month>")?;
    let period = args::period(args[0], args[1])?;
    let view = context
        .months
        .get_monthly_overview(i64::from(period.year), i64::from(period.month))?;
    print_overview(&view);
    Ok(())
}

fn cmd_month_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let months = context.months.list_months()?;
    if months.is_empty() {
        output::info("No months recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(&["Month", "Rate", "Id"]);
    for month in &months {
        table.add_row(vec![
            format!("{:04}-{:02}", month.year, month.month),
            month.exchange_rate.clone(),
            month.id.to_string(),
        ]);
    }
    output::section("Months");
    table.print();
    Ok(())
}

fn cmd_month_history(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let history = context.months.balance_history()?;
    if history.is_empty() {
        output::info("No months recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(&["Month", "Carry-over", "Collected", "Donated", "Remaining"]);
    for step in &history {
        table.add_row(vec![
            format!("{:04}-{:02}", step.year, step.month),
            format_kyat_str(&step.carry_over),
            format_kyat_str(&step.total_collected),
            format_kyat_str(&step.total_donated),
            format_kyat_str(&step.remaining_balance),
        ]);
    }
    output::section("Balance history");
    table.print();
    Ok(())
}

fn cmd_prev_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 2, "prev-balance <year> <month>")?;
    // Unparseable input is passed through as out-of-range so the service answers "0".
    let year = validation::parse_integer(args[0], "year").unwrap_or(0);
    let month = validation::parse_integer(args[1], "month").unwrap_or(0);
    let balance = context.months.get_previous_month_balance(year, month)?;
    output::info(format!("Previous month balance: {}", format_kyat_str(&balance)));
    Ok(())
}

fn cmd_rate_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 3, "rate-set <year> <month> <exchange-rate>")?;
    let period = args::period(args[0], args[1])?;
    let rate: Decimal = validation::parse_rate(args[2])?;
    let id = context
        .months
        .overview_id_for(i64::from(period.year), i64::from(period.month))?;
    let view = context.months.update_exchange_rate(id, rate)?;
    output::success(format!(
        "Exchange rate for {period} set to {}; donations re-converted.",
        view.exchange_rate
    ));
    print_overview(&view);
    Ok(())
}

pub(super) fn print_overview(view: &MonthlyOverviewView) {
    output::section(format!("{:04}-{:02}", view.year, view.month));
    output::key_values(&[
        ("Id", view.id.to_string()),
        ("Exchange rate", format!("{} MMK/JPY", view.exchange_rate)),
        ("Carry-over", format_kyat_str(&view.carry_over)),
        ("Total collected", format_kyat_str(&view.total_collected)),
        ("Total donated", format_kyat_str(&view.total_donated)),
        ("Remaining balance", format_kyat_str(&view.remaining_balance)),
    ]);

    if !view.supporter_donations.is_empty() {
        let mut table = Table::new(&["Supporter", "Amount", "Kyat", "Id"]);
        for donation in &view.supporter_donations {
            table.add_row(vec![
                donation.name.clone(),
                format!("{} {}", donation.amount, donation.currency),
                format_kyat_str(&donation.kyat_amount),
                donation.id.to_string(),
            ]);
        }
        output::section("Supporter donations");
        table.print();
    }

    if !view.distribution_records.is_empty() {
        let mut table = Table::new(&["Recipient", "Amount", "Remarks", "Id"]);
        for record in &view.distribution_records {
            table.add_row(vec![
                record.recipient.clone(),
                format_kyat_str(&record.amount_mmk),
                record.remarks.clone().unwrap_or_default(),
                record.id.to_string(),
            ]);
        }
        output::section("Distributions");
        table.print();
    }
}
