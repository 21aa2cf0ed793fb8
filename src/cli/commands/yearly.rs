use crate::{
    cli::{
        context::ShellContext,
        errors::CommandResult,
        output::{self, Table},
        registry::CommandEntry,
    },
    core::{
        services::{validation, YearlySummaryInput},
        views::YearlySummaryView,
    },
    currency::format_kyat_str,
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "yearly-set",
            "Record a year's totals",
            "yearly-set <year> <total-collected> <total-donated> [notes]",
            cmd_set,
        ),
        CommandEntry::new("yearly-show", "Show a year's totals", "yearly-show <year>", cmd_show),
        CommandEntry::new("yearly-list", "List every recorded year", "yearly-list", cmd_list),
        CommandEntry::new(
            "yearly-total",
            "Totals across every recorded year",
            "yearly-total",
            cmd_total,
        ),
    ]
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 3, "yearly-set <year> <total-collected> <total-donated> [notes]")?;
    let view = context.yearly.upsert(YearlySummaryInput {
        year: validation::parse_integer(args[0], "year")?,
        total_collected: validation::parse_amount(args[1], "total collected")?,
        total_donated: validation::parse_amount(args[2], "total donated")?,
        notes: args::optional(args, 3),
    })?;
    output::success(format!("Totals for {} saved.", view.year));
    print_year(&view);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "yearly-show <year>")?;
    let view = context
        .yearly
        .get(validation::parse_integer(args[0], "year")?)?;
    print_year(&view);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let years = context.yearly.list()?;
    if years.is_empty() {
        output::info("No yearly summaries recorded.");
        return Ok(());
    }
    let mut table = Table::new(&["Year", "Collected", "Donated", "Balance"]);
    for year in &years {
        table.add_row(vec![
            year.year.to_string(),
            format_kyat_str(&year.total_collected),
            format_kyat_str(&year.total_donated),
            format_kyat_str(&year.balance),
        ]);
    }
    output::section("Yearly summaries");
    table.print();
    Ok(())
}

fn cmd_total(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let total = context.yearly.grand_total()?;
    output::section(format!("Grand total ({} years)", total.years));
    output::key_values(&[
        ("Collected", format_kyat_str(&total.total_collected)),
        ("Donated", format_kyat_str(&total.total_donated)),
        ("Balance", format_kyat_str(&total.balance)),
    ]);
    Ok(())
}

fn print_year(view: &YearlySummaryView) {
    output::section(view.year);
    let mut rows = vec![
        ("Collected", format_kyat_str(&view.total_collected)),
        ("Donated", format_kyat_str(&view.total_donated)),
        ("Balance", format_kyat_str(&view.balance)),
    ];
    if let Some(notes) = &view.notes {
        rows.push(("Notes", notes.clone()));
    }
    output::key_values(&rows);
}
