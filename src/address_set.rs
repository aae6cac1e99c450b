// Copyright (c) 2025 - Cowboy AI, Inc.
//! Order-preserving deduplication
//!
//! A hash set would lose the order addresses were reported in, and that
//! order is meaningful (first is preferred), so the first occurrence of each
//! key wins and everything after it is dropped.

use std::collections::HashSet;

use crate::domain::{InterfaceAddress, SpaceAddress};

/// Keep the first item for every distinct key, preserving order
pub fn dedupe<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: AsRef<str>,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key(item).as_ref().to_owned()))
        .collect()
}

/// Deduplicate raw strings (addresses or CIDRs)
pub fn dedupe_strings(values: Vec<String>) -> Vec<String> {
    dedupe(values, |v| v.clone())
}

/// Deduplicate by address value; records differing only in scope collapse
pub fn dedupe_space_addresses(addrs: Vec<SpaceAddress>) -> Vec<SpaceAddress> {
    dedupe(addrs, |a| a.value.clone())
}

/// Deduplicate interface addresses by address value
pub fn dedupe_interface_addresses(addrs: Vec<InterfaceAddress>) -> Vec<InterfaceAddress> {
    if addrs.len() <= 1 {
        return addrs;
    }
    dedupe(addrs, |a| a.address.clone())
}
