//! Admin shell over the donation services.

pub mod commands;
mod context;
pub mod errors;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError, CommandResult};
pub use shell::{run_cli, SCRIPT_ENV};
