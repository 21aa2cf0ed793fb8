use std::{path::PathBuf, sync::Arc};

use tracing::info;

use crate::{
    config::{Config, ConfigManager},
    core::{
        errors::CoreError,
        services::{DonationPlaceService, MonthlyOverviewService, UserService, YearlySummaryService},
    },
    storage::{JsonFile, JsonStore},
};

use super::{
    commands,
    errors::{CliError, CommandError},
    output,
    registry::{CommandEntry, CommandRegistry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Everything a command handler can reach: configuration, the open store, and the
/// services bound to it.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: Arc<JsonStore>,
    pub months: MonthlyOverviewService,
    pub places: DonationPlaceService,
    pub users: UserService,
    pub yearly: YearlySummaryService,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        output::set_preferences(output::OutputPreferences {
            color: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let store = Arc::new(open_store(&config, config_manager.base_dir().to_path_buf())?);
        info!(path = %store.backend().path().display(), "ledger store opened");

        Ok(Self {
            mode,
            registry: commands::registry(),
            months: MonthlyOverviewService::new(store.clone()),
            places: DonationPlaceService::new(store.clone()),
            users: UserService::new(store.clone()),
            yearly: YearlySummaryService::new(store.clone()),
            store,
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        "donation> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.resolve(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match self.registry.resolve(command).map(|entry| entry.handler) {
            Some(handler) => match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(err) => report_core_error(&err),
            other => output::error(other),
        }
    }

    /// Reopens the store after a configuration change that moves the data file.
    pub(crate) fn reload_store(&mut self) -> Result<(), CliError> {
        let store = Arc::new(open_store(
            &self.config,
            self.config_manager.base_dir().to_path_buf(),
        )?);
        self.months = MonthlyOverviewService::new(store.clone());
        self.places = DonationPlaceService::new(store.clone());
        self.users = UserService::new(store.clone());
        self.yearly = YearlySummaryService::new(store.clone());
        self.store = store;
        info!(path = %self.store.backend().path().display(), "ledger store reopened");
        Ok(())
    }
}

fn open_store(config: &Config, base: PathBuf) -> Result<JsonStore, CliError> {
    let data_dir = config.resolve_data_dir(&base);
    let backend = JsonFile::with_backups(
        config.ledger_path(&base),
        data_dir.join("backups"),
        config.backup_retention,
    );
    Ok(JsonStore::open(backend)?)
}

fn report_core_error(err: &CoreError) {
    match err.code() {
        Some(code) => output::error(format!("[{code}] {err}")),
        None => output::error(err),
    }
}
