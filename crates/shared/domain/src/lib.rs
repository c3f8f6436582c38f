//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `rust_decimal`, `strum`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod catalog;
pub mod settings;
pub mod shipping;

pub use rust_decimal::Decimal;
