use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Same value as the column length of the persisted ZIP pattern.
pub const ZIP_POSTAL_CODE_MAX_LENGTH: usize = 400;

/// A "shipping by order total" rate row.
///
/// `store_id`, `country_id` and `state_province_id` use `0` for "any".
/// An empty `zip_postal_code` matches every destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingByTotalRecord {
    pub id: i32,
    pub shipping_method_id: i32,
    pub store_id: i32,
    pub country_id: i32,
    pub state_province_id: i32,
    pub zip_postal_code: Option<String>,
    pub display_order: i32,
    pub from: Decimal,
    pub to: Option<Decimal>,
    pub use_percentage: bool,
    pub shipping_charge_percentage: Decimal,
    pub shipping_charge_amount: Decimal,
}

impl ShippingByTotalRecord {
    /// The charge relevant for the configured mode.
    #[must_use]
    pub const fn configured_charge(&self) -> Decimal {
        if self.use_percentage { self.shipping_charge_percentage } else { self.shipping_charge_amount }
    }

    /// Whether `subtotal` falls into the inclusive `[from, to]` range.
    #[must_use]
    pub fn covers(&self, subtotal: Decimal) -> bool {
        subtotal >= self.from && self.to.is_none_or(|to| subtotal <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingMethod {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub display_order: i32,
    /// Countries where this method is not offered.
    pub restricted_country_ids: Vec<i32>,
}

impl ShippingMethod {
    #[must_use]
    pub fn is_available_in(&self, country_id: i32) -> bool {
        !self.restricted_country_ids.contains(&country_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub country_id: Option<i32>,
    pub state_province_id: Option<i32>,
    pub zip_postal_code: Option<String>,
}

/// A cart line that has to be shipped. Lines are shippable unless `is_ship_enabled` says
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentItem {
    pub product_id: i32,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub is_free_shipping: bool,
    pub is_ship_enabled: bool,
}

impl Default for ShipmentItem {
    fn default() -> Self {
        Self { product_id: 0, quantity: 0, unit_price: Decimal::ZERO, is_free_shipping: false, is_ship_enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub name: String,
    pub description: String,
    pub rate: Decimal,
    pub shipping_rate_computation_method_system_name: String,
}

/// Result of asking a rate provider for options. Errors are carried, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetShippingOptionResponse {
    pub shipping_options: Vec<ShippingOption>,
    pub errors: Vec<String>,
}

impl GetShippingOptionResponse {
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingRateComputationMethodType {
    /// Rates are computed locally from configured data.
    Offline,
    /// Rates come from a carrier API.
    Realtime,
}
