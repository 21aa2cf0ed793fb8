//! Input checks shared by the services. Each helper returns the normalized value or a
//! `VALIDATION_ERROR`.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    core::errors::{CoreError, CoreResult},
    domain::{Currency, Period, Role},
};

pub fn period(year: i64, month: i64) -> CoreResult<Period> {
    Ok(Period::new(year, month)?)
}

/// Accepts year and month as text, e.g. from a query string or shell arguments.
pub fn coerce_period(year: &str, month: &str) -> CoreResult<Period> {
    let year = parse_integer(year, "year")?;
    let month = parse_integer(month, "month")?;
    period(year, month)
}

pub fn parse_integer(raw: &str, field: &str) -> CoreResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::validation(format!("{field} must be an integer, got `{raw}`")))
}

pub fn require_id(id: Uuid, field: &str) -> CoreResult<Uuid> {
    if id.is_nil() {
        Err(CoreError::validation(format!("{field} is required")))
    } else {
        Ok(id)
    }
}

pub fn parse_id(raw: &str, field: &str) -> CoreResult<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation(format!("{field} is required")));
    }
    let id = Uuid::parse_str(trimmed)
        .map_err(|_| CoreError::validation(format!("{field} `{trimmed}` is not a valid id")))?;
    require_id(id, field)
}

pub fn require_text(value: &str, field: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::validation(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub fn non_negative(value: i64, field: &str) -> CoreResult<i64> {
    if value < 0 {
        Err(CoreError::validation(format!(
            "{field} must not be negative, got {value}"
        )))
    } else {
        Ok(value)
    }
}

pub fn parse_amount(raw: &str, field: &str) -> CoreResult<i64> {
    let value = parse_integer(raw, field)?;
    non_negative(value, field)
}

pub fn positive_rate(rate: Decimal) -> CoreResult<Decimal> {
    if rate > Decimal::ZERO {
        Ok(rate)
    } else {
        Err(CoreError::validation(format!(
            "exchange rate must be greater than zero, got {rate}"
        )))
    }
}

pub fn parse_rate(raw: &str) -> CoreResult<Decimal> {
    let rate = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| CoreError::validation(format!("exchange rate `{raw}` is not a number")))?;
    positive_rate(rate)
}

pub fn parse_currency(raw: &str) -> CoreResult<Currency> {
    raw.parse::<Currency>().map_err(CoreError::Validation)
}

pub fn parse_role(raw: &str) -> CoreResult<Role> {
    raw.parse::<Role>().map_err(CoreError::Validation)
}

pub fn email(value: &str) -> CoreResult<String> {
    let trimmed = require_text(value, "email")?;
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(trimmed.to_ascii_lowercase())
        }
        _ => Err(CoreError::validation(format!(
            "`{trimmed}` is not an email address"
        ))),
    }
}
