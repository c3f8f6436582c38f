use super::load_snapshot;
use crate::models::args::QuoteArgs;
use anyhow::{Result, bail};
use storefront::StorefrontSettings;
use storefront::domain::shipping::Address;
use storefront::shipping::{
    DefaultPriceCalculationService, GetShippingOptionRequest, InMemoryShippingByTotalService,
    InMemoryShippingService, ShippingSnapshot,
};
use tracing::warn;

/// Prints one `name<TAB>rate` line per available shipping option.
///
/// # Errors
/// Returns an error when the rate file is unusable or the response carries errors.
pub fn handle(settings: &StorefrontSettings, args: QuoteArgs) -> Result<()> {
    let snapshot: ShippingSnapshot = load_snapshot(&args.rates)?;
    let provider = storefront::shipping_by_total(
        InMemoryShippingByTotalService::new(snapshot.records)?,
        InMemoryShippingService::new(snapshot.methods),
        DefaultPriceCalculationService,
        settings,
    );

    let mut request = GetShippingOptionRequest::builder().items(args.items).store_id(args.store).build();
    if !args.no_address {
        request.shipping_address =
            Some(Address { country_id: args.country, state_province_id: args.state, zip_postal_code: args.zip });
    }

    let response = provider.get_shipping_options(&request);
    for option in &response.shipping_options {
        println!("{}\t{}", option.name, option.rate);
    }

    if !response.errors.is_empty() {
        for error in &response.errors {
            warn!(%error, "Shipping quote error");
        }
        bail!("{}", response.errors.join("; "));
    }
    Ok(())
}
