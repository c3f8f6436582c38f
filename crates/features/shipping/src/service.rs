use crate::error::ShippingError;
use crate::zip::ZipPattern;
use fxhash::FxHashMap;
use serde::Deserialize;
use std::sync::Arc;
use storefront_domain::Decimal;
use storefront_domain::shipping::{
    ShipmentItem, ShippingByTotalRecord, ShippingMethod, ZIP_POSTAL_CODE_MAX_LENGTH,
};
use tracing::{debug, info};

/// Lookup of the rate record that applies to a destination and subtotal.
pub trait ShippingByTotalService {
    fn find_record(
        &self,
        shipping_method_id: i32,
        store_id: i32,
        country_id: i32,
        subtotal: Decimal,
        state_province_id: i32,
        zip_postal_code: Option<&str>,
    ) -> Option<ShippingByTotalRecord>;
}

/// Shipping methods offered to a country, display order.
pub trait ShippingService {
    fn shipping_methods(&self, country_id: i32) -> Vec<ShippingMethod>;
}

/// Price of one shipment line.
pub trait PriceCalculationService {
    fn sub_total(&self, item: &ShipmentItem) -> Decimal;
}

impl<S: ShippingByTotalService + ?Sized> ShippingByTotalService for Arc<S> {
    fn find_record(
        &self,
        shipping_method_id: i32,
        store_id: i32,
        country_id: i32,
        subtotal: Decimal,
        state_province_id: i32,
        zip_postal_code: Option<&str>,
    ) -> Option<ShippingByTotalRecord> {
        (**self).find_record(shipping_method_id, store_id, country_id, subtotal, state_province_id, zip_postal_code)
    }
}

impl<S: ShippingService + ?Sized> ShippingService for Arc<S> {
    fn shipping_methods(&self, country_id: i32) -> Vec<ShippingMethod> {
        (**self).shipping_methods(country_id)
    }
}

impl<S: PriceCalculationService + ?Sized> PriceCalculationService for Arc<S> {
    fn sub_total(&self, item: &ShipmentItem) -> Decimal {
        (**self).sub_total(item)
    }
}

/// `unit_price * quantity`, saturating at [`Decimal::MAX`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPriceCalculationService;

impl PriceCalculationService for DefaultPriceCalculationService {
    fn sub_total(&self, item: &ShipmentItem) -> Decimal {
        item.unit_price.checked_mul(Decimal::from(item.quantity)).unwrap_or(Decimal::MAX)
    }
}

/// Serialized shipping configuration, e.g. a TOML fixture with `[[records]]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShippingSnapshot {
    pub methods: Vec<ShippingMethod>,
    pub records: Vec<ShippingByTotalRecord>,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: ShippingByTotalRecord,
    zip: ZipPattern,
}

/// In-memory rate records, grouped by shipping method.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingByTotalService {
    by_method: FxHashMap<i32, Vec<StoredRecord>>,
}

impl InMemoryShippingByTotalService {
    /// # Errors
    /// Returns [`ShippingError::InvalidRecord`] for the first record that fails validation.
    pub fn new(records: impl IntoIterator<Item = ShippingByTotalRecord>) -> Result<Self, ShippingError> {
        let mut service = Self::default();
        for record in records {
            service.insert(record)?;
        }
        info!(methods = service.by_method.len(), "Shipping by total records loaded");
        Ok(service)
    }

    /// # Errors
    /// Returns [`ShippingError::InvalidRecord`] when the ZIP pattern is too long or the
    /// subtotal range is inverted.
    pub fn insert(&mut self, record: ShippingByTotalRecord) -> Result<(), ShippingError> {
        let pattern = record.zip_postal_code.as_deref().unwrap_or_default();
        if pattern.chars().count() > ZIP_POSTAL_CODE_MAX_LENGTH {
            return Err(ShippingError::InvalidRecord {
                id: record.id,
                message: format!("ZIP pattern exceeds {ZIP_POSTAL_CODE_MAX_LENGTH} characters").into(),
                context: None,
            });
        }
        if record.to.is_some_and(|to| to < record.from) {
            return Err(ShippingError::InvalidRecord {
                id: record.id,
                message: "order total range ends before it starts".into(),
                context: None,
            });
        }

        let zip = ZipPattern::new(pattern);
        let records = self.by_method.entry(record.shipping_method_id).or_default();
        records.push(StoredRecord { record, zip });
        records.sort_by_key(|stored| (stored.record.display_order, stored.record.id));
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }
}

impl ShippingByTotalService for InMemoryShippingByTotalService {
    fn find_record(
        &self,
        shipping_method_id: i32,
        store_id: i32,
        country_id: i32,
        subtotal: Decimal,
        state_province_id: i32,
        zip_postal_code: Option<&str>,
    ) -> Option<ShippingByTotalRecord> {
        let candidates: Vec<&StoredRecord> = self
            .by_method
            .get(&shipping_method_id)?
            .iter()
            .filter(|stored| stored.record.covers(subtotal))
            .collect();

        let candidates = narrow(candidates, |r| r.record.store_id, store_id);
        let candidates = narrow(candidates, |r| r.record.country_id, country_id);
        let candidates = narrow(candidates, |r| r.record.state_province_id, state_province_id);

        let zip = zip_postal_code.unwrap_or_default();
        let matching: Vec<&StoredRecord> =
            candidates.iter().copied().filter(|stored| stored.zip.matches(zip)).collect();
        let found = if matching.is_empty() {
            candidates.into_iter().find(|stored| stored.zip.is_empty())
        } else {
            matching.into_iter().next()
        };

        debug!(shipping_method_id, record_id = found.map(|s| s.record.id), "Shipping by total record lookup");
        found.map(|stored| stored.record.clone())
    }
}

/// Exact matches on `key`, or the records using `0` ("any") when there are none.
fn narrow<'a>(
    candidates: Vec<&'a StoredRecord>,
    key: impl Fn(&StoredRecord) -> i32,
    wanted: i32,
) -> Vec<&'a StoredRecord> {
    let exact: Vec<_> = candidates.iter().copied().filter(|r| key(*r) == wanted).collect();
    if exact.is_empty() { candidates.into_iter().filter(|r| key(*r) == 0).collect() } else { exact }
}

/// In-memory shipping methods.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingService {
    methods: Vec<ShippingMethod>,
}

impl InMemoryShippingService {
    #[must_use]
    pub fn new(mut methods: Vec<ShippingMethod>) -> Self {
        methods.sort_by_key(|m| (m.display_order, m.id));
        Self { methods }
    }
}

impl ShippingService for InMemoryShippingService {
    fn shipping_methods(&self, country_id: i32) -> Vec<ShippingMethod> {
        self.methods.iter().filter(|m| m.is_available_in(country_id)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i32) -> ShippingByTotalRecord {
        ShippingByTotalRecord { id, shipping_method_id: 1, shipping_charge_amount: Decimal::from(id), ..Default::default() }
    }

    fn lookup(service: &InMemoryShippingByTotalService, country: i32, state: i32, zip: Option<&str>) -> Option<i32> {
        service.find_record(1, 0, country, Decimal::from(50), state, zip).map(|r| r.id)
    }

    #[test]
    fn exact_location_beats_wildcards() {
        let service = InMemoryShippingByTotalService::new([
            record(1),
            ShippingByTotalRecord { country_id: 7, ..record(2) },
            ShippingByTotalRecord { country_id: 7, state_province_id: 3, ..record(3) },
        ])
        .unwrap();

        assert_eq!(lookup(&service, 7, 3, None), Some(3));
        assert_eq!(lookup(&service, 7, 4, None), Some(2));
        assert_eq!(lookup(&service, 8, 3, None), Some(1));
    }

    #[test]
    fn subtotal_range_is_inclusive() {
        let service = InMemoryShippingByTotalService::new([
            ShippingByTotalRecord { from: Decimal::ZERO, to: Some(Decimal::from(50)), ..record(1) },
            ShippingByTotalRecord { from: Decimal::from(50), to: None, display_order: 1, ..record(2) },
        ])
        .unwrap();

        assert_eq!(service.find_record(1, 0, 0, Decimal::from(50), 0, None).map(|r| r.id), Some(1));
        assert_eq!(service.find_record(1, 0, 0, Decimal::new(5001, 2), 0, None).map(|r| r.id), Some(2));
        assert!(service.find_record(2, 0, 0, Decimal::from(50), 0, None).is_none());
    }

    #[test]
    fn zip_pattern_beats_empty_pattern() {
        let service = InMemoryShippingByTotalService::new([
            record(1),
            ShippingByTotalRecord { zip_postal_code: Some("10000:19999".into()), ..record(2) },
        ])
        .unwrap();

        assert_eq!(lookup(&service, 0, 0, Some("12345")), Some(2));
        assert_eq!(lookup(&service, 0, 0, Some("22345")), Some(1));
        assert_eq!(lookup(&service, 0, 0, None), Some(1));
    }

    #[test]
    fn display_order_then_id_breaks_ties() {
        let service = InMemoryShippingByTotalService::new([
            ShippingByTotalRecord { display_order: 2, ..record(1) },
            ShippingByTotalRecord { display_order: 1, ..record(3) },
            ShippingByTotalRecord { display_order: 1, ..record(2) },
        ])
        .unwrap();

        assert_eq!(service.len(), 3);
        assert_eq!(lookup(&service, 0, 0, None), Some(2));
    }

    #[test]
    fn invalid_records_are_rejected() {
        let long = ShippingByTotalRecord { zip_postal_code: Some("1".repeat(401)), ..record(9) };
        let err = InMemoryShippingByTotalService::new([long]).unwrap_err();
        assert!(matches!(err, ShippingError::InvalidRecord { id: 9, .. }));

        let max = ShippingByTotalRecord { zip_postal_code: Some("1".repeat(400)), ..record(8) };
        assert!(InMemoryShippingByTotalService::new([max]).is_ok());

        let inverted = ShippingByTotalRecord { from: Decimal::TEN, to: Some(Decimal::ONE), ..record(7) };
        assert!(InMemoryShippingByTotalService::new([inverted]).is_err());
    }

    #[test]
    fn methods_respect_country_restrictions_and_order() {
        let service = InMemoryShippingService::new(vec![
            ShippingMethod { id: 2, name: "Express".into(), display_order: 2, ..Default::default() },
            ShippingMethod { id: 1, name: "Ground".into(), display_order: 1, restricted_country_ids: vec![5], ..Default::default() },
        ]);

        let names: Vec<_> = service.shipping_methods(1).into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Ground", "Express"]);
        assert_eq!(service.shipping_methods(5).len(), 1);
    }

    #[test]
    fn default_price_is_unit_price_times_quantity() {
        let item = ShipmentItem { quantity: 3, unit_price: Decimal::new(1999, 2), ..Default::default() };
        assert_eq!(DefaultPriceCalculationService.sub_total(&item), Decimal::new(5997, 2));
    }
}
