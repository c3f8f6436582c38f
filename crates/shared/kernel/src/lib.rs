//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain crate and hosts settings loading.
//!
//! ## Settings loading
//! ```rust,no_run
//! use storefront_kernel::config::load_settings;
//! use storefront_kernel::domain::settings::StorefrontSettings;
//!
//! let settings: StorefrontSettings = load_settings(Some("storefront")).unwrap_or_default();
//! ```
pub mod config;

pub use storefront_domain as domain;
