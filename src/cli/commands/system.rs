use crate::{
    cli::{
        context::ShellContext,
        errors::{CommandError, CommandResult},
        output::{self, Table},
        registry::CommandEntry,
    },
    config::Config,
    storage::SNAPSHOT_SCHEMA_VERSION,
    utils::build_info,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change configuration",
            "config [<key> [<value>|unset]]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let rows: Vec<(&str, String)> = Config::KEYS
                .iter()
                .map(|key| context.config.get(key).map(|value| (*key, value)))
                .collect::<Result<_, _>>()?;
            output::section("Configuration");
            output::key_values(&rows);
            output::info(format!(
                "Config file: {}",
                context.config_manager.config_path().display()
            ));
            Ok(())
        }
        [key] => {
            output::info(format!("{key} = {}", context.config.get(key)?));
            Ok(())
        }
        [key, value @ ..] => {
            let mut updated = context.config.clone();
            updated.set(key, &value.join(" "))?;
            context.config_manager.save(&updated)?;
            let moves_store = updated.data_dir != context.config.data_dir
                || updated.ledger_file != context.config.ledger_file
                || updated.backup_retention != context.config.backup_retention;
            context.config = updated;
            if *key == "ui_color_enabled" {
                output::set_preferences(output::OutputPreferences {
                    color: context.config.ui_color_enabled
                        && context.mode == crate::cli::CliMode::Interactive,
                });
            }
            if moves_store {
                context
                    .reload_store()
                    .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            }
            output::success(format!("{key} = {}", context.config.get(key)?));
            Ok(())
        }
    }
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Donation Core {}", meta.version));
    output::key_values(&[
        ("Data schema", format!("v{SNAPSHOT_SCHEMA_VERSION}")),
        ("Build hash", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built at", meta.timestamp.to_string()),
        ("Target", meta.target.to_string()),
        ("Profile", meta.profile.to_string()),
        ("Rustc", meta.rustc.to_string()),
        (
            "Data file",
            context.store.backend().path().display().to_string(),
        ),
    ]);
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(name) {
            Some(entry) => {
                output::section(format!("Help: {}", entry.name));
                output::key_values(&[
                    ("Description", entry.description.to_string()),
                    ("Usage", entry.usage.to_string()),
                ]);
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    for group in context.registry.groups() {
        let mut table = Table::new(&["Command", "Description"]);
        for entry in &group.commands {
            table.add_row(vec![entry.name.to_string(), entry.description.to_string()]);
        }
        output::section(group.title);
        table.print();
    }
    output::hint("Use `help <command>` for usage details.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
