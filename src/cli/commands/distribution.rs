use crate::{
    cli::{context::ShellContext, errors::CommandResult, output, registry::CommandEntry},
    core::services::{validation, DistributionUpdateInput, NewDistributionInput},
    currency::format_kyat_str,
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "distribution-add",
            "Record a distribution paid out in kyat",
            "distribution-add <year> <month> <recipient> <amount-mmk> [place-id|-] [remarks]",
            cmd_add,
        ),
        CommandEntry::new(
            "distribution-edit",
            "Replace a distribution record's details",
            "distribution-edit <id> <recipient> <amount-mmk> [place-id|-] [remarks]",
            cmd_edit,
        ),
        CommandEntry::new(
            "distribution-remove",
            "Hide a distribution record (restorable)",
            "distribution-remove <id>",
            cmd_remove,
        ),
        CommandEntry::new(
            "distribution-restore",
            "Bring back a removed distribution record",
            "distribution-restore <id>",
            cmd_restore,
        ),
        CommandEntry::new(
            "distribution-purge",
            "Delete a distribution record permanently",
            "distribution-purge <id>",
            cmd_purge,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str =
        "distribution-add <year> <month> <recipient> <amount-mmk> [place-id|-] [remarks]";
    args::require(args, 4, USAGE)?;
    let period = args::period(args[0], args[1])?;
    let overview_id = context
        .months
        .overview_id_for(i64::from(period.year), i64::from(period.month))?;
    let donation_place_id = args::optional(args, 4)
        .map(|raw| args::id(&raw, "donation place id"))
        .transpose()?;
    let view = context.months.add_distribution_record(NewDistributionInput {
        overview_id,
        recipient: args[2].to_string(),
        donation_place_id,
        amount_mmk: validation::parse_amount(args[3], "amount")?,
        remarks: args::optional(args, 5),
    })?;
    output::success(format!(
        "Distribution to {} recorded: {}.",
        view.recipient,
        format_kyat_str(&view.amount_mmk)
    ));
    output::info(format!("Id: {}", view.id));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "distribution-edit <id> <recipient> <amount-mmk> [place-id|-] [remarks]";
    args::require(args, 3, USAGE)?;
    let donation_place_id = args::optional(args, 3)
        .map(|raw| args::id(&raw, "donation place id"))
        .transpose()?;
    let view = context
        .months
        .update_distribution_record(DistributionUpdateInput {
            id: args::id(args[0], "distribution id")?,
            recipient: args[1].to_string(),
            donation_place_id,
            amount_mmk: validation::parse_amount(args[2], "amount")?,
            remarks: args::optional(args, 4),
        })?;
    output::success(format!(
        "Distribution updated: {} to {}.",
        format_kyat_str(&view.amount_mmk),
        view.recipient
    ));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "distribution-remove <id>")?;
    let view = context
        .months
        .remove_distribution_record(args::id(args[0], "distribution id")?)?;
    output::success(format!("Distribution to {} removed.", view.recipient));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "distribution-restore <id>")?;
    let view = context
        .months
        .restore_distribution_record(args::id(args[0], "distribution id")?)?;
    output::success(format!("Distribution to {} restored.", view.recipient));
    Ok(())
}

fn cmd_purge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "distribution-purge <id>")?;
    let id = args::id(args[0], "distribution id")?;
    context.months.purge_distribution_record(id)?;
    output::success(format!("Distribution {id} permanently deleted."));
    Ok(())
}
