use rust_decimal_macros::dec;
use std::sync::Arc;
use storefront_domain::Decimal;
use storefront_domain::settings::{RoundingMode, ShippingByTotalSettings};
use storefront_domain::shipping::{Address, ShipmentItem, ShippingRateComputationMethodType};
use storefront_shipping::{
    DefaultPriceCalculationService, GetShippingOptionRequest, InMemoryShippingByTotalService,
    InMemoryShippingService, SYSTEM_NAME, ShippingByTotalComputationMethod, ShippingSnapshot,
};

type Method = ShippingByTotalComputationMethod<
    Arc<InMemoryShippingByTotalService>,
    InMemoryShippingService,
    DefaultPriceCalculationService,
>;

fn method(limit_methods_to_created: bool) -> Method {
    let snapshot: ShippingSnapshot =
        toml::from_str(include_str!("fixtures/rates.toml")).expect("rates fixture");
    let records = InMemoryShippingByTotalService::new(snapshot.records).expect("valid records");

    ShippingByTotalComputationMethod::new(
        Arc::new(records),
        InMemoryShippingService::new(snapshot.methods),
        DefaultPriceCalculationService,
        ShippingByTotalSettings { limit_methods_to_created, rounding: RoundingMode::ToEven },
    )
}

fn item(unit_price: Decimal, quantity: u32) -> ShipmentItem {
    ShipmentItem { product_id: 1, quantity, unit_price, is_free_shipping: false, is_ship_enabled: true }
}

fn address(country_id: i32, zip: &str) -> Address {
    Address { country_id: Some(country_id), state_province_id: None, zip_postal_code: Some(zip.to_owned()) }
}

fn rates(request: &GetShippingOptionRequest, method: &Method) -> Vec<(String, Decimal)> {
    let response = method.get_shipping_options(request);
    assert!(response.success(), "unexpected errors: {:?}", response.errors);
    response.shipping_options.into_iter().map(|o| (o.name, o.rate)).collect()
}

#[test]
fn quotes_every_method_for_a_small_order() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![
            item(dec!(20.00), 2),
            ShipmentItem { is_free_shipping: true, ..item(dec!(100), 1) },
            ShipmentItem { is_ship_enabled: false, ..item(dec!(50), 1) },
        ])
        .shipping_address(address(1, "12345"))
        .build();

    assert_eq!(
        rates(&request, &method(false)),
        vec![
            ("Ground".to_owned(), dec!(4.00)),
            ("Next Day Air".to_owned(), dec!(19.95)),
            ("Pickup".to_owned(), Decimal::ZERO),
        ]
    );
}

#[test]
fn strict_mode_hides_unconfigured_methods() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(dec!(20.00), 2)])
        .shipping_address(address(1, "12345"))
        .build();

    let names: Vec<_> = rates(&request, &method(true)).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Ground", "Next Day Air"]);
}

#[test]
fn large_orders_ship_free_by_ground() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(dec!(75.00), 2)])
        .shipping_address(address(1, "12345"))
        .build();

    assert_eq!(rates(&request, &method(true))[0], ("Ground".to_owned(), Decimal::ZERO));
}

#[test]
fn remote_zip_uses_its_own_record() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(dec!(75.00), 2)])
        .shipping_address(address(1, "99601"))
        .build();

    assert_eq!(rates(&request, &method(false))[0], ("Ground".to_owned(), dec!(25.00)));
}

#[test]
fn restricted_country_does_not_see_the_method() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(dec!(10), 1)])
        .shipping_address(address(40, ""))
        .build();

    let names: Vec<_> = rates(&request, &method(false)).into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Ground", "Pickup"]);
}

#[test]
fn options_carry_the_provider_name() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(dec!(10), 1)])
        .shipping_address(address(1, ""))
        .build();

    let response = method(false).get_shipping_options(&request);
    assert!(response.shipping_options.iter().all(|o| o.shipping_rate_computation_method_system_name == SYSTEM_NAME));
}

#[test]
fn invalid_requests_are_reported_in_the_response() {
    let method = method(false);

    let empty = GetShippingOptionRequest::builder().shipping_address(address(1, "")).build();
    let response = method.get_shipping_options(&empty);
    assert_eq!(response.errors, vec!["No shipment items"]);
    assert!(response.shipping_options.is_empty());

    let no_address = GetShippingOptionRequest::builder().items(vec![item(dec!(1), 1)]).build();
    let response = method.get_shipping_options(&no_address);
    assert_eq!(response.errors, vec!["Shipping address is not set"]);
    assert!(!response.success());
}

#[test]
fn subtotal_overflow_is_reported() {
    let request = GetShippingOptionRequest::builder()
        .items(vec![item(Decimal::MAX, 1), item(Decimal::MAX, 1)])
        .shipping_address(address(1, ""))
        .build();

    let response = method(false).get_shipping_options(&request);
    assert_eq!(response.errors, vec!["Order subtotal is out of range"]);
}

#[test]
fn rate_lookup_and_fixed_rate() {
    let lenient = method(false);
    let strict = method(true);

    assert_eq!(lenient.get_rate(dec!(200.00), 1, 0, 0, 0, None), Some(Decimal::ZERO));
    assert_eq!(lenient.get_rate(dec!(50.00), 1, 0, 0, 0, None), Some(dec!(5.00)));
    assert_eq!(lenient.get_rate(dec!(50.00), 3, 0, 0, 0, None), Some(Decimal::ZERO));
    assert_eq!(strict.get_rate(dec!(50.00), 3, 0, 0, 0, None), None);

    let request = GetShippingOptionRequest::default();
    assert_eq!(lenient.get_fixed_rate(&request), None);
    assert_eq!(lenient.method_type(), ShippingRateComputationMethodType::Offline);
}
