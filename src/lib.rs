#![doc(test(attr(deny(warnings))))]

//! Donation Core keeps the books of a volunteer donation fund: monthly ledgers of
//! supporter donations (JPY or MMK) and kyat distributions, with each month's opening
//! balance carried over from the full history.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{
    errors::{CoreError, CoreResult, ErrorCode},
    services::{
        DonationPlaceService, MonthlyOverviewService, UserService, YearlySummaryService,
    },
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Donation Core tracing initialized.");
    });
}
