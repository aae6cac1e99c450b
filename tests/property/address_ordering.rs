// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Scope Ordering and Egress Precedence

use cim_network_info::domain::{
    sort_addresses, InterfaceAddress, InterfaceRecord, SpaceAddressBuilder,
};
use cim_network_info::egress::{resolve_egress, select_egress, EgressSource};
use cim_network_info::SpaceAddress;
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Interface record, fan or not, with a handful of addresses
fn interface_record() -> impl Strategy<Value = InterfaceRecord> {
    (
        prop::bool::ANY,
        0u8..16,
        prop::collection::vec(0u8..255, 1..4),
    )
        .prop_map(|(is_fan, index, hosts)| {
            let (name, prefix) = if is_fan {
                (format!("fan-{index}"), "252.0.0")
            } else {
                (format!("eth{index}"), "10.0.0")
            };
            let addresses = hosts
                .into_iter()
                .map(|host| InterfaceAddress::new(format!("{prefix}.{host}")))
                .collect();
            InterfaceRecord::new(name, addresses)
        })
}

fn ipv4() -> impl Strategy<Value = String> {
    (1u8..224, 0u8..=255, 0u8..=255, 1u8..255).prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
}

fn cidr() -> impl Strategy<Value = String> {
    (ipv4(), 8u8..=32).prop_map(|(ip, prefix)| format!("{ip}/{prefix}"))
}

fn ingress_addresses() -> impl Strategy<Value = Vec<SpaceAddress>> {
    prop::collection::vec(ipv4().prop_map(SpaceAddress::new), 0..5)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Fan overlay addresses never precede non-fan addresses built
    /// from the same device records.
    #[test]
    fn prop_fan_addresses_sort_last(records in prop::collection::vec(interface_record(), 0..8)) {
        let mut addrs = SpaceAddressBuilder::default().from_interface_info(&records);
        sort_addresses(&mut addrs);

        if let Some(first_fan) = addrs.iter().position(|a| a.is_fan()) {
            prop_assert!(
                addrs[first_fan..].iter().all(|a| a.is_fan()),
                "Non-fan address found after a fan address"
            );
        }
    }

    /// Property: Sorting keeps reported order among equally ranked addresses
    #[test]
    fn prop_sort_is_stable(records in prop::collection::vec(interface_record(), 0..8)) {
        let built = SpaceAddressBuilder::default().from_interface_info(&records);
        let mut sorted = built.clone();
        sort_addresses(&mut sorted);

        let non_fan: Vec<_> = built.iter().filter(|a| !a.is_fan()).collect();
        let sorted_non_fan: Vec<_> = sorted.iter().filter(|a| !a.is_fan()).collect();
        prop_assert_eq!(non_fan, sorted_non_fan);
    }

    /// Property: Non-empty explicit egress always wins
    #[test]
    fn prop_explicit_egress_wins(
        explicit in prop::collection::vec(cidr(), 1..4),
        default_egress in prop::collection::vec(cidr(), 0..4),
        ingress in ingress_addresses(),
    ) {
        let selected = select_egress(&explicit, &default_egress, &ingress);
        prop_assert_eq!(selected, Some((EgressSource::Explicit, explicit)));
    }

    /// Property: Without explicit egress, a non-empty default wins
    #[test]
    fn prop_default_egress_beats_inference(
        default_egress in prop::collection::vec(cidr(), 1..4),
        ingress in ingress_addresses(),
    ) {
        prop_assert_eq!(resolve_egress(&[], &default_egress, &ingress), default_egress);
    }

    /// Property: Inference yields at most one subnet, from the first address
    #[test]
    fn prop_inference_uses_first_address_only(ingress in ingress_addresses()) {
        let egress = resolve_egress(&[], &[], &ingress);
        match ingress.first() {
            Some(first) => prop_assert_eq!(egress, vec![format!("{}/32", first.value)]),
            None => prop_assert!(egress.is_empty()),
        }
    }
}
