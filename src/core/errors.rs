use std::{fmt, result::Result as StdResult};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    currency::ConversionError,
    domain::{Period, PeriodError},
    storage::StoreError,
};

/// Stable machine-readable codes exposed at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    MonthNotFound,
    DuplicateMonth,
    OverviewNotFound,
    RecordNotFound,
    DuplicateRecord,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::MonthNotFound => "MONTH_NOT_FOUND",
            ErrorCode::DuplicateMonth => "DUPLICATE_MONTH",
            ErrorCode::OverviewNotFound => "OVERVIEW_NOT_FOUND",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::DuplicateRecord => "DUPLICATE_RECORD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the services. Every variant except [`CoreError::Store`] maps to a
/// domain [`ErrorCode`].
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("No monthly overview recorded for {0}")]
    MonthNotFound(Period),
    #[error("A monthly overview for {0} already exists")]
    DuplicateMonth(Period),
    #[error("Monthly overview {0} not found")]
    OverviewNotFound(Uuid),
    #[error("{entity} `{key}` not found")]
    RecordNotFound { entity: &'static str, key: String },
    #[error("{0}")]
    DuplicateRecord(String),
    #[error(transparent)]
    Store(StoreError),
}

pub type CoreResult<T> = StdResult<T, CoreError>;

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CoreError::Validation(_) => Some(ErrorCode::ValidationError),
            CoreError::MonthNotFound(_) => Some(ErrorCode::MonthNotFound),
            CoreError::DuplicateMonth(_) => Some(ErrorCode::DuplicateMonth),
            CoreError::OverviewNotFound(_) => Some(ErrorCode::OverviewNotFound),
            CoreError::RecordNotFound { .. } => Some(ErrorCode::RecordNotFound),
            CoreError::DuplicateRecord(_) => Some(ErrorCode::DuplicateRecord),
            CoreError::Store(_) => None,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.code().is_some()
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => CoreError::RecordNotFound { entity, key },
            StoreError::Aborted(message) => CoreError::Validation(message),
            other => CoreError::Store(other),
        }
    }
}

impl From<PeriodError> for CoreError {
    fn from(err: PeriodError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<ConversionError> for CoreError {
    fn from(err: ConversionError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
