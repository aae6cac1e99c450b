// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Order-Preserving Deduplication

use cim_network_info::address_set::{dedupe, dedupe_space_addresses, dedupe_strings};
use cim_network_info::{Scope, SpaceAddress};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Small pool of addresses so sequences repeat often
fn address_value() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|host| format!("10.0.0.{host}"))
}

fn address_sequence() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(address_value(), 0..40)
}

fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![
        Just(Scope::Public),
        Just(Scope::CloudLocal),
        Just(Scope::MachineLocal),
        Just(Scope::FanLocal),
        Just(Scope::Unknown),
    ]
}

fn scoped_sequence() -> impl Strategy<Value = Vec<SpaceAddress>> {
    prop::collection::vec(
        (address_value(), scope()).prop_map(|(value, scope)| SpaceAddress::new_scoped(value, scope)),
        0..40,
    )
}

/// Reference: first index of each distinct value, in order
fn first_occurrences(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Output holds each distinct key exactly once
    #[test]
    fn prop_dedupe_contains_each_key_once(values in address_sequence()) {
        let out = dedupe_strings(values.clone());

        let distinct: HashSet<&String> = values.iter().collect();
        let unique: HashSet<&String> = out.iter().collect();

        prop_assert_eq!(out.len(), distinct.len(), "No duplicates may survive");
        prop_assert_eq!(unique, distinct, "No key may be lost");
    }

    /// Property: First-occurrence order is preserved
    #[test]
    fn prop_dedupe_preserves_first_occurrence_order(values in address_sequence()) {
        prop_assert_eq!(dedupe_strings(values.clone()), first_occurrences(&values));
    }

    /// Property: Deduplication is idempotent
    #[test]
    fn prop_dedupe_is_idempotent(values in address_sequence()) {
        let once = dedupe_strings(values);
        let twice = dedupe_strings(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Property: Space addresses collapse by value regardless of scope,
    /// keeping the first record seen.
    #[test]
    fn prop_space_addresses_dedupe_by_value(addrs in scoped_sequence()) {
        let out = dedupe_space_addresses(addrs.clone());

        let values: Vec<String> = addrs.iter().map(|a| a.value.clone()).collect();
        let out_values: Vec<String> = out.iter().map(|a| a.value.clone()).collect();
        prop_assert_eq!(out_values, first_occurrences(&values));

        for kept in &out {
            let first = addrs.iter().find(|a| a.value == kept.value).unwrap();
            prop_assert_eq!(kept.scope, first.scope);
        }
    }

    /// Property: The generic form agrees with a custom key
    #[test]
    fn prop_generic_dedupe_by_last_octet(values in address_sequence()) {
        let by_octet = dedupe(values.clone(), |v| v.rsplit('.').next().unwrap_or_default().to_string());
        prop_assert_eq!(by_octet, dedupe_strings(values));
    }
}
