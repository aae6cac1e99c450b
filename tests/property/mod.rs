// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `address_set` - order-preserving deduplication
//! - `address_ordering` - scope-aware sorting and egress precedence

mod address_ordering;
mod address_set;
