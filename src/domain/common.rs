//! Shared traits, calendar periods, and lifecycle markers for ledger entities.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Earliest year accepted for a monthly overview.
pub const MIN_YEAR: i32 = 2000;
/// Latest year accepted for a monthly overview.
pub const MAX_YEAR: i32 = 2100;

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("year must be between {MIN_YEAR} and {MAX_YEAR}, got {0}")]
    YearOutOfRange(i64),
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(i64),
    #[error("`{0}` is not a valid year-month (expected YYYY-MM)")]
    Malformed(String),
}

/// A calendar month. Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i64, month: i64) -> Result<Self, PeriodError> {
        if !(MIN_YEAR as i64..=MAX_YEAR as i64).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self {
            year: year as i32,
            month: month as u32,
        })
    }

    /// The month immediately before this one, or `None` when it would leave the
    /// supported year range.
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year as i64 - 1, 12).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodError::Malformed(trimmed.to_string()))?;
        let year: i64 = year
            .parse()
            .map_err(|_| PeriodError::Malformed(trimmed.to_string()))?;
        let month: i64 = month
            .parse()
            .map_err(|_| PeriodError::Malformed(trimmed.to_string()))?;
        Period::new(year, month)
    }
}

/// Visible lifecycle state of a soft-deletable record. A purged record has no state;
/// it simply no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Active,
    SoftDeleted,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lifecycle::Active => "Active",
            Lifecycle::SoftDeleted => "Deleted",
        };
        f.write_str(label)
    }
}

/// Records hidden by a nullable deletion timestamp rather than removed.
pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, value: Option<DateTime<Utc>>);

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }

    fn lifecycle(&self) -> Lifecycle {
        if self.is_active() {
            Lifecycle::Active
        } else {
            Lifecycle::SoftDeleted
        }
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.set_deleted_at(Some(at));
    }

    fn restore(&mut self) {
        self.set_deleted_at(None);
    }
}

macro_rules! soft_deletable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::domain::common::SoftDeletable for $ty {
                fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                    self.deleted_at
                }

                fn set_deleted_at(&mut self, value: Option<chrono::DateTime<chrono::Utc>>) {
                    self.deleted_at = value;
                }
            }

            impl $crate::domain::common::Identifiable for $ty {
                fn id(&self) -> uuid::Uuid {
                    self.id
                }
            }
        )+
    };
}

pub(crate) use soft_deletable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_orders_december_before_next_january() {
        let december = Period::new(2024, 12).unwrap();
        let january = Period::new(2025, 1).unwrap();
        assert!(december < january);
        assert_eq!(january.previous(), Some(december));
    }

    #[test]
    fn period_rejects_out_of_range_values() {
        assert_eq!(Period::new(1999, 5), Err(PeriodError::YearOutOfRange(1999)));
        assert_eq!(Period::new(2101, 5), Err(PeriodError::YearOutOfRange(2101)));
        assert_eq!(Period::new(2025, 0), Err(PeriodError::MonthOutOfRange(0)));
        assert_eq!(Period::new(2025, 13), Err(PeriodError::MonthOutOfRange(13)));
    }

    #[test]
    fn previous_of_first_supported_month_is_none() {
        let first = Period::new(MIN_YEAR as i64, 1).unwrap();
        assert_eq!(first.previous(), None);
    }

    #[test]
    fn parses_and_displays_year_month() {
        let period: Period = "2025-05".parse().unwrap();
        assert_eq!(period, Period::new(2025, 5).unwrap());
        assert_eq!(period.to_string(), "2025-05");
        assert!(matches!(
            "May 2025".parse::<Period>(),
            Err(PeriodError::Malformed(_))
        ));
    }
}
