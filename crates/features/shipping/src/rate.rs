use crate::error::ShippingError;
use rust_decimal::RoundingStrategy;
use storefront_domain::Decimal;
use storefront_domain::settings::{RoundingMode, ShippingByTotalSettings};
use storefront_domain::shipping::ShippingByTotalRecord;

/// Decimal places of a computed charge.
pub const RATE_SCALE: u32 = 2;

pub(crate) const fn strategy(mode: RoundingMode) -> RoundingStrategy {
    match mode {
        RoundingMode::ToEven => RoundingStrategy::MidpointNearestEven,
        RoundingMode::AwayFromZero => RoundingStrategy::MidpointAwayFromZero,
    }
}

/// The charge `record` yields for `subtotal`.
///
/// * no record: `None` when methods are limited to configured ones, zero otherwise;
/// * a non-positive configured charge: zero;
/// * percentage mode: `subtotal * percentage / 100`, rounded to cents;
/// * flat mode: the configured amount.
///
/// Results never go below zero.
///
/// # Errors
/// Returns [`ShippingError::Overflow`] when the percentage product is not representable.
pub fn compute_rate(
    record: Option<&ShippingByTotalRecord>,
    subtotal: Decimal,
    settings: &ShippingByTotalSettings,
) -> Result<Option<Decimal>, ShippingError> {
    let Some(record) = record else {
        return Ok((!settings.limit_methods_to_created).then_some(Decimal::ZERO));
    };
    if record.configured_charge() <= Decimal::ZERO {
        return Ok(Some(Decimal::ZERO));
    }

    let total = if record.use_percentage {
        subtotal
            .checked_mul(record.shipping_charge_percentage)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| ShippingError::Overflow {
                message: format!("{subtotal} * {}%", record.shipping_charge_percentage).into(),
                context: None,
            })?
            .round_dp_with_strategy(RATE_SCALE, strategy(settings.rounding))
    } else {
        record.shipping_charge_amount
    };

    Ok(Some(total.max(Decimal::ZERO)))
}
