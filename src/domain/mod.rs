//! Pure domain models (months, donations, distributions, places, users, yearly totals).
//! No I/O and no storage concerns. Only data types and their invariants.

pub mod common;
pub mod overview;
pub mod place;
pub mod user;
pub mod yearly;

pub use common::*;
pub use overview::*;
pub use place::*;
pub use user::*;
pub use yearly::*;
