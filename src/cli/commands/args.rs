use uuid::Uuid;

use crate::{
    cli::errors::CommandError,
    core::services::validation,
    domain::Period,
};

pub(super) fn require(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < count {
        Err(usage_error(usage))
    } else {
        Ok(())
    }
}

pub(super) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

pub(super) fn period(year: &str, month: &str) -> Result<Period, CommandError> {
    Ok(validation::coerce_period(year, month)?)
}

pub(super) fn id(raw: &str, field: &str) -> Result<Uuid, CommandError> {
    Ok(validation::parse_id(raw, field)?)
}

/// `-` and `none` mean "no value".
pub(super) fn optional(args: &[&str], idx: usize) -> Option<String> {
    args.get(idx)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty() && *value != "-" && !value.eq_ignore_ascii_case("none"))
        .map(str::to_string)
}

pub(super) fn include_deleted(args: &[&str]) -> bool {
    args.iter().any(|arg| *arg == "--all" || *arg == "-a")
}
