use crate::{
    cli::{
        context::ShellContext,
        errors::CommandResult,
        output::{self, Table},
        registry::CommandEntry,
    },
    core::services::{validation, NewUserInput},
};

use super::args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "user-add",
            "Add a dashboard user",
            "user-add <name> <email> <admin|editor|viewer>",
            cmd_add,
        ),
        CommandEntry::new(
            "user-role",
            "Change a user's role",
            "user-role <id> <admin|editor|viewer>",
            cmd_role,
        ),
        CommandEntry::new(
            "user-list",
            "List users (`--all` includes removed ones)",
            "user-list [--all]",
            cmd_list,
        ),
        CommandEntry::new("user-remove", "Deactivate a user", "user-remove <id>", cmd_remove),
        CommandEntry::new(
            "user-restore",
            "Reactivate a removed user",
            "user-restore <id>",
            cmd_restore,
        ),
        CommandEntry::new(
            "user-purge",
            "Delete a user permanently",
            "user-purge <id>",
            cmd_purge,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 3, "user-add <name> <email> <admin|editor|viewer>")?;
    let user = context.users.create(NewUserInput {
        name: args[0].to_string(),
        email: args[1].to_string(),
        role: validation::parse_role(args[2])?,
    })?;
    output::success(format!(
        "User {} <{}> added as {} (id {}).",
        user.name, user.email, user.role, user.id
    ));
    Ok(())
}

fn cmd_role(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 2, "user-role <id> <admin|editor|viewer>")?;
    let id = args::id(args[0], "user id")?;
    let user = context.users.change_role(id, validation::parse_role(args[1])?)?;
    output::success(format!("{} is now {}.", user.email, user.role));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let users = context.users.list(args::include_deleted(args))?;
    if users.is_empty() {
        output::info("No users.");
        return Ok(());
    }
    let mut table = Table::new(&["Name", "Email", "Role", "Status", "Id"]);
    for user in &users {
        table.add_row(vec![
            user.name.clone(),
            user.email.clone(),
            user.role.to_string(),
            format!("{:?}", user.status),
            user.id.to_string(),
        ]);
    }
    output::section("Users");
    table.print();
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "user-remove <id>")?;
    let user = context.users.remove(args::id(args[0], "user id")?)?;
    output::success(format!("User {} removed.", user.email));
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "user-restore <id>")?;
    let user = context.users.restore(args::id(args[0], "user id")?)?;
    output::success(format!("User {} restored.", user.email));
    Ok(())
}

fn cmd_purge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    args::require(args, 1, "user-purge <id>")?;
    let id = args::id(args[0], "user id")?;
    context.users.purge(id)?;
    output::success(format!("User {id} permanently deleted."));
    Ok(())
}
