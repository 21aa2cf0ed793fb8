use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output,
        registry::CommandEntry,
    },
    core::{
        services::{validation, DonationUpdateInput, NewDonationInput},
        views::DonationView,
    },
    currency::format_kyat_str,
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "donation-add",
            "Record a supporter donation",
            "donation-add <year> <month> <name> <amount> <JPY|MMK> [kyat-amount]",
            cmd_add,
        ),
        CommandEntry::new(
            "donation-edit",
            "Replace a supporter donation's details",
            "donation-edit <id> <name> <amount> <JPY|MMK> [kyat-amount]",
            cmd_edit,
        ),
        CommandEntry::new(
            "donation-remove",
            "Hide a supporter donation (restorable)",
            "donation-remove <id>",
            cmd_remove,
        ),
        CommandEntry::new(
            "donation-restore",
            "Bring back a removed supporter donation",
            "donation-restore <id>",
            cmd_restore,
        ),
        CommandEntry::new(
            "donation-purge",
            "Delete a supporter donation permanently",
            "donation-purge <id>",
            cmd_purge,
        ),
    ]
}

fn optional_kyat(args: &[&str], idx: usize) -> Result<Option<i64>, CommandError> {
    args::optional(args, idx)
        .map(|raw| validation::parse_amount(&raw, "kyat amount"))
        .transpose()
        .map_err(Into::into)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "donation-add <year> <month> <name> <amount> <JPY|MMK> [kyat-amount]";
    args::require(args, 5, USAGE)?;
    let period = args::period(args[0], args[1])?;
    let overview_id = context
        .months
        .overview_id_for(i64::from(period.year), i64::from(period.month))?;
    let view = context.months.add_supporter_donation(NewDonationInput {
        overview_id,
        name: args[2].to_string(),
        amount: validation::parse_amount(args[3], "amount")?,
        currency: validation::parse_currency(args[4])?,
        kyat_amount: optional_kyat(args, 5)?,
    })?;
    output::success(format!(
        "Donation from {} recorded: {}.",
        view.name,
        describe(&view)
    ));
    output::info(format!("Id: {}", view.id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "donation-edit <id> <name> <amount> <JPY|MMK> [kyat-amount]";
    args::require(args, 4, USAGE)?;
    let view = context.months.update_supporter_donation(DonationUpdateInput {
        id: args::id(args[0], "donation id")?,
        name: args[1].to_string(),
        amount: validation::parse_amount(args[2], "amount")?,
        currency: validation::parse_currency(args[3])?,
        kyat_amount: optional_kyat(args, 4)?,
    })?;
    output::success(format!("Donation updated: {}.", describe(&view)));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "donation-remove <id>")?;
    let view = context
        .months
        .remove_supporter_donation(args::id(args[0], "donation id")?)?;
    output::success(format!("Donation from {} removed.", view.name));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "donation-restore <id>")?;
    let view = context
        .months
        .restore_supporter_donation(args::id(args[0], "donation id")?)?;
    output::success(format!("Donation from {} restored.", view.name));
    Ok(())
}

fn cmd_purge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "donation-purge <id>")?;
    let id = args::id(args[0], "donation id")?;
    context.months.purge_supporter_donation(id)?;
    output::success(format!("Donation {id} permanently deleted."));
    Ok(())
}

fn describe(view: &DonationView) -> String {
    format!(
        "{} {} = {}",
        view.amount,
        view.currency,
        format_kyat_str(&view.kyat_amount)
    )
}
