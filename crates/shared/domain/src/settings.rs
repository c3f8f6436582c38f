use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level settings shared across the storefront crates.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorefrontSettingsInner {
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
    pub shipping: ShippingByTotalSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct StorefrontSettings {
    #[serde(flatten, default)]
    inner: Arc<StorefrontSettingsInner>,
}

impl Deref for StorefrontSettings {
    type Target = StorefrontSettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for StorefrontSettings {
    fn deref_mut(&mut self) -> &mut StorefrontSettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Console / file logging knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub filter: Option<String>,
}

/// Attribute codec settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Upper bound on generated attribute combinations per product. `None` is unbounded.
    pub max_combinations: Option<usize>,
}

/// Settings of the "shipping by order total" rate provider.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShippingByTotalSettings {
    /// Hide shipping methods that have no configured record instead of charging zero.
    pub limit_methods_to_created: bool,
    pub rounding: RoundingMode,
}

/// Midpoint rule used when rounding percentage charges to cents.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Banker's rounding (`0.125 -> 0.12`).
    #[default]
    ToEven,
    /// Commercial rounding (`0.125 -> 0.13`).
    AwayFromZero,
}

// --- Default ---

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, directory: None, json: false, filter: None }
    }
}
