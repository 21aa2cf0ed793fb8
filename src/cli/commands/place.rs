use crate::cli::{
    context::ShellContext,
    errors::CommandResult,
    output::{self, Table},
    registry::CommandEntry,
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("place-add", "Register a donation place", "place-add <name>", cmd_add),
        CommandEntry::new(
            "place-rename",
            "Rename a donation place",
            "place-rename <id> <name>",
            cmd_rename,
        ),
        CommandEntry::new(
            "place-list",
            "List donation places (`--all` includes removed ones)",
            "place-list [--all]",
            cmd_list,
        ),
        CommandEntry::new("place-remove", "Hide a donation place", "place-remove <id>", cmd_remove),
        CommandEntry::new(
            "place-restore",
            "Bring back a removed donation place",
            "place-restore <id>",
            cmd_restore,
        ),
        CommandEntry::new(
            "place-purge",
            "Delete a donation place permanently",
            "place-purge <id>",
            cmd_purge,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "place-add <name>")?;
    let place = context.places.create(&args.join(" "))?;
    output::success(format!("Donation place `{}` added (id {}).", place.name, place.id));
    Ok(())
}

fn cmd_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 2, "place-rename <id> <name>")?;
    let id = args::id(args[0], "place id")?;
    let place = context.places.rename(id, &args[1..].join(" "))?;
    output::success(format!("Donation place renamed to `{}`.", place.name));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let places = context.places.list(args::include_deleted(args))?;
    if places.is_empty() {
        output::info("No donation places.");
        return Ok(());
    }
    let mut table = Table::new(&["Name", "Status", "Id"]);
    for place in &places {
        table.add_row(vec![
            place.name.clone(),
            format!("{:?}", place.status),
            place.id.to_string(),
        ]);
    }
    output::section("Donation places");
    table.print();
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "place-remove <id>")?;
    let place = context.places.remove(args::id(args[0], "place id")?)?;
    output::success(format!("Donation place `{}` removed.", place.name));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "place-restore <id>")?;
    let place = context.places.restore(args::id(args[0], "place id")?)?;
    output::success(format!("Donation place `{}` restored.", place.name));
    Ok(())
}

fn cmd_purge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "place-purge <id>")?;
    let id = args::id(args[0], "place id")?;
    context.places.purge(id)?;
    output::success(format!("Donation place {id} permanently deleted."));
    Ok(())
}
