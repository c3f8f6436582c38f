//! # Shipping by Order Total
//!
//! An offline rate provider: the charge for each shipping method comes from a configured
//! record selected by order subtotal and destination.
//!
//! * **Records ([`ShippingByTotalService`]):** lookup by method, store, country,
//!   state / province and [ZIP pattern](zip::ZipPattern), the most specific match winning.
//! * **Rates ([`rate::compute_rate`]):** a flat amount or a percentage of the subtotal,
//!   rounded to cents.
//! * **Options ([`ShippingByTotalComputationMethod`]):** one option per method that yields
//!   a rate for a checkout request.
//!
//! Methods without a record are charged zero unless `limit_methods_to_created` is set, in
//! which case they are hidden.

mod error;
mod method;
pub mod rate;
mod service;
pub mod zip;

pub use crate::error::{ShippingError, ShippingErrorExt};
pub use crate::method::{GetShippingOptionRequest, SYSTEM_NAME, ShippingByTotalComputationMethod};
pub use crate::service::{
    DefaultPriceCalculationService, InMemoryShippingByTotalService, InMemoryShippingService,
    PriceCalculationService, ShippingByTotalService, ShippingService, ShippingSnapshot,
};
