use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the denormalized yearly totals table. Maintained by administrators and
/// never derived from the monthly ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub total_collected: i64,
    pub total_donated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl YearlySummary {
    pub fn new(year: i32, total_collected: i64, total_donated: i64) -> Self {
        Self {
            year,
            total_collected,
            total_donated,
            notes: None,
            updated_at: Utc::now(),
        }
    }

    pub fn balance(&self) -> i128 {
        self.total_collected as i128 - self.total_donated as i128
    }
}
