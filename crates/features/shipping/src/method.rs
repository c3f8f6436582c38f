use crate::error::ShippingError;
use crate::rate::compute_rate;
use crate::service::{PriceCalculationService, ShippingByTotalService, ShippingService};
use storefront_domain::Decimal;
use storefront_domain::settings::ShippingByTotalSettings;
use storefront_domain::shipping::{
    Address, GetShippingOptionResponse, ShipmentItem, ShippingOption, ShippingRateComputationMethodType,
};
use tracing::{debug, instrument, warn};
use typed_builder::TypedBuilder;

/// Name the provider is registered under.
pub const SYSTEM_NAME: &str = "Shipping.ByTotal";

/// A checkout asking for shipping options.
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct GetShippingOptionRequest {
    #[builder(default)]
    pub items: Vec<ShipmentItem>,
    #[builder(default, setter(strip_option))]
    pub shipping_address: Option<Address>,
    #[builder(default)]
    pub store_id: i32,
}

/// The "shipping by order total" rate provider.
#[derive(Debug, Clone)]
pub struct ShippingByTotalComputationMethod<R, M, P> {
    records: R,
    methods: M,
    prices: P,
    settings: ShippingByTotalSettings,
}

impl<R, M, P> ShippingByTotalComputationMethod<R, M, P>
where
    R: ShippingByTotalService,
    M: ShippingService,
    P: PriceCalculationService,
{
    pub const fn new(records: R, methods: M, prices: P, settings: ShippingByTotalSettings) -> Self {
        Self { records, methods, prices, settings }
    }

    pub const fn settings(&self) -> &ShippingByTotalSettings {
        &self.settings
    }

    #[must_use]
    pub const fn method_type(&self) -> ShippingRateComputationMethodType {
        ShippingRateComputationMethodType::Offline
    }

    /// Rates depend on the destination, so there is never a fixed one.
    #[must_use]
    pub const fn get_fixed_rate(&self, _request: &GetShippingOptionRequest) -> Option<Decimal> {
        None
    }

    /// Rate of one shipping method, see [`compute_rate`].
    ///
    /// # Errors
    /// Returns [`ShippingError::Overflow`] when the charge cannot be represented.
    pub fn try_get_rate(
        &self,
        subtotal: Decimal,
        shipping_method_id: i32,
        store_id: i32,
        country_id: i32,
        state_province_id: i32,
        zip_postal_code: Option<&str>,
    ) -> Result<Option<Decimal>, ShippingError> {
        let record = self.records.find_record(
            shipping_method_id,
            store_id,
            country_id,
            subtotal,
            state_province_id,
            zip_postal_code,
        );
        compute_rate(record.as_ref(), subtotal, &self.settings)
    }

    /// [`Self::try_get_rate`] with an unrepresentable charge treated as no rate.
    #[must_use]
    pub fn get_rate(
        &self,
        subtotal: Decimal,
        shipping_method_id: i32,
        store_id: i32,
        country_id: i32,
        state_province_id: i32,
        zip_postal_code: Option<&str>,
    ) -> Option<Decimal> {
        self.try_get_rate(subtotal, shipping_method_id, store_id, country_id, state_province_id, zip_postal_code)
            .unwrap_or_else(|error| {
                warn!(shipping_method_id, %error, "Shipping rate dropped");
                None
            })
    }

    /// Options for every shipping method that yields a rate.
    ///
    /// Free-shipping and non-shippable items do not count towards the subtotal. Problems
    /// with the request are reported in the response errors.
    #[instrument(skip_all, fields(store_id = request.store_id, items = request.items.len()))]
    pub fn get_shipping_options(&self, request: &GetShippingOptionRequest) -> GetShippingOptionResponse {
        let mut response = GetShippingOptionResponse::default();

        if request.items.is_empty() {
            response.add_error("No shipment items");
            return response;
        }
        let Some(address) = &request.shipping_address else {
            response.add_error("Shipping address is not set");
            return response;
        };

        let country_id = address.country_id.unwrap_or_default();
        let state_province_id = address.state_province_id.unwrap_or_default();
        let zip = address.zip_postal_code.as_deref();

        let Some(subtotal) = self.shippable_subtotal(&request.items) else {
            response.add_error("Order subtotal is out of range");
            return response;
        };
        debug!(%subtotal, country_id, state_province_id, "Computing shipping by total");

        for method in self.methods.shipping_methods(country_id) {
            match self.try_get_rate(subtotal, method.id, request.store_id, country_id, state_province_id, zip) {
                Ok(Some(rate)) => response.shipping_options.push(ShippingOption {
                    name: method.name,
                    description: method.description,
                    rate,
                    shipping_rate_computation_method_system_name: SYSTEM_NAME.to_owned(),
                }),
                Ok(None) => debug!(method_id = method.id, "No configured rate, method hidden"),
                Err(error) => response.add_error(error.to_string()),
            }
        }

        response
    }

    fn shippable_subtotal(&self, items: &[ShipmentItem]) -> Option<Decimal> {
        items
            .iter()
            .filter(|item| !item.is_free_shipping && item.is_ship_enabled)
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(self.prices.sub_total(item)))
    }
}
