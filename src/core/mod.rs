//! Business logic: the carry-over engine, services, boundary views, and errors.
//! Depends on the domain and on storage traits only, never on a concrete backend.

pub mod carry_over;
pub mod errors;
pub mod services;
pub mod utils;
pub mod views;
