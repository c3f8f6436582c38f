//! Facade crate for the storefront feature slices and shared modules.
//! Re-exports domain/kernel primitives and wires slices from [`StorefrontSettings`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `storefront` with the desired feature flags (`catalog`/`shipping`).
//! - Load settings with [`kernel::config::load_settings`] and hand them to the builders below.

pub use storefront_domain as domain;
#[cfg(feature = "catalog")]
pub use storefront_catalog as catalog;
pub use storefront_kernel as kernel;
#[cfg(feature = "shipping")]
pub use storefront_shipping as shipping;

pub use storefront_domain::settings::StorefrontSettings;

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "catalog")]
        "catalog",
        #[cfg(feature = "shipping")]
        "shipping",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Attribute parser configured from the `catalog` settings section.
#[cfg(feature = "catalog")]
pub fn attribute_parser<S>(service: S, settings: &StorefrontSettings) -> catalog::ProductAttributeParser<S>
where
    S: catalog::ProductAttributeService,
{
    catalog::ProductAttributeParser::with_settings(service, settings.catalog.clone())
}

/// Shipping-by-total provider configured from the `shipping` settings section.
#[cfg(feature = "shipping")]
pub fn shipping_by_total<R, M, P>(
    records: R,
    methods: M,
    prices: P,
    settings: &StorefrontSettings,
) -> shipping::ShippingByTotalComputationMethod<R, M, P>
where
    R: shipping::ShippingByTotalService,
    M: shipping::ShippingService,
    P: shipping::PriceCalculationService,
{
    shipping::ShippingByTotalComputationMethod::new(records, methods, prices, settings.shipping.clone())
}
