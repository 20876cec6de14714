//! Shipping resolution properties, end to end through `shipping::resolve`.

#![allow(clippy::unwrap_used)]

use nature_pharmacy_core::shipping::{self, QuoteStatus, ShippingQuote};
use nature_pharmacy_core::{Money, ZoneId};
use nature_pharmacy_integration_tests::{money, scenario_zones, zone};

fn zone_id(quote: &ShippingQuote) -> Option<i32> {
    quote.zone.as_ref().map(|z| z.id.as_i32())
}

#[test]
fn test_same_inputs_same_quote() {
    let zones = scenario_zones();
    let first = shipping::resolve("SN", Some("Dakar"), 12_345, &zones).unwrap();
    for _ in 0..10 {
        assert_eq!(
            shipping::resolve("SN", Some("Dakar"), 12_345, &zones).unwrap(),
            first
        );
    }
}

#[test]
fn test_inactive_zones_never_match() {
    let mut zones = scenario_zones();
    zones[1].is_active = false;

    let quote = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(1));

    for z in &mut zones {
        z.is_active = false;
    }
    let quote = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    assert_eq!(quote, ShippingQuote::unserviceable());
}

#[test]
fn test_zone_must_list_the_country() {
    let zones = vec![zone(1, &["ML", "GN"], &[], 7500, None, 1)];
    let quote = shipping::resolve("SN", None, 10_000, &zones).unwrap();
    assert_eq!(quote.status(), QuoteStatus::Unserviceable);

    let quote = shipping::resolve("GN", None, 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(1));
}

#[test]
fn test_region_zone_wins_regardless_of_priority() {
    let zones = vec![
        zone(1, &["SN"], &[], 2000, None, -100),
        zone(2, &["SN"], &["Dakar"], 1000, None, 1_000),
    ];
    let quote = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(2));

    // No region given: plain priority order.
    let quote = shipping::resolve("SN", None, 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(1));
}

#[test]
fn test_unmatched_region_falls_back_to_country_wide() {
    // A zone restricted to Dakar must not quote Thiès, whatever its priority.
    let zones = vec![
        zone(1, &["SN"], &[], 2000, None, 5),
        zone(2, &["SN"], &["Dakar"], 1000, None, 1),
    ];
    let thies = shipping::resolve("SN", Some("Thiès"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&thies), Some(1));
    assert_eq!(thies.shipping_cost, money(2000));

    let anywhere = shipping::resolve("SN", None, 10_000, &zones).unwrap();
    assert_eq!(zone_id(&anywhere), Some(1));

    let dakar = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&dakar), Some(2));
}

#[test]
fn test_region_restricted_zones_serve_only_without_country_wide() {
    let zones = vec![zone(2, &["SN"], &["Dakar"], 1000, None, 1)];
    let quote = shipping::resolve("SN", Some("Thiès"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(2));
}

#[test]
fn test_lowest_priority_wins_within_a_tier() {
    let zones = vec![
        zone(1, &["SN"], &[], 3000, None, 5),
        zone(2, &["SN"], &[], 2500, None, 2),
        zone(3, &["SN"], &[], 2000, None, 9),
    ];
    let quote = shipping::resolve("SN", None, 10_000, &zones).unwrap();
    assert_eq!(zone_id(&quote), Some(2));
    assert_eq!(quote.shipping_cost, money(2500));
}

#[test]
fn test_equal_priority_keeps_input_order() {
    let zones = vec![
        zone(7, &["SN"], &[], 3000, None, 1),
        zone(3, &["SN"], &[], 2500, None, 1),
    ];
    let quote = shipping::resolve("SN", None, 10_000, &zones).unwrap();
    assert_eq!(quote.zone.unwrap().id, ZoneId::new(7));
}

#[test]
fn test_threshold_is_inclusive() {
    let zones = vec![zone(1, &["SN"], &[], 3500, Some(50_000), 1)];

    let below = shipping::resolve("SN", None, 49_999, &zones).unwrap();
    assert_eq!(below.shipping_cost, money(3500));
    assert!(!below.free_shipping_applied);

    let at = shipping::resolve("SN", None, 50_000, &zones).unwrap();
    assert_eq!(at.shipping_cost, Money::ZERO);
    assert!(at.free_shipping_applied);
    assert_eq!(at.threshold_met(), Some(money(50_000)));
}

#[test]
fn test_no_threshold_always_charges() {
    let zones = vec![zone(1, &["SN"], &[], 3500, None, 1)];
    for total in [0, 1, 50_000, 10_000_000] {
        let quote = shipping::resolve("SN", None, total, &zones).unwrap();
        assert_eq!(quote.shipping_cost, money(3500));
        assert!(!quote.free_shipping_applied);
    }
}

#[test]
fn test_country_matching_ignores_case() {
    let zones = scenario_zones();
    let upper = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    let lower = shipping::resolve("sn", Some("dakar"), 10_000, &zones).unwrap();
    let mixed = shipping::resolve("Sn", Some(" DAKAR "), 10_000, &zones).unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
}

#[test]
fn test_checkout_scenario() {
    let zones = scenario_zones();

    let dakar = shipping::resolve("SN", Some("Dakar"), 10_000, &zones).unwrap();
    assert_eq!(zone_id(&dakar), Some(2));
    assert_eq!(dakar.shipping_cost, money(1000));
    assert!(!dakar.free_shipping_applied);

    let thies = shipping::resolve("SN", Some("Thies"), 60_000, &zones).unwrap();
    assert_eq!(zone_id(&thies), Some(1));
    assert_eq!(thies.shipping_cost, Money::ZERO);
    assert!(thies.free_shipping_applied);

    let france = shipping::resolve("FR", None, 5000, &zones).unwrap();
    assert_eq!(france.shipping_cost, Money::ZERO);
    assert!(france.zone.is_none());
    assert!(!france.free_shipping_applied);
}
