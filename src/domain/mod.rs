// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Domain Models
//!
//! Value objects the resolution core works with. All of them are plain
//! snapshots; nothing here talks to the backing store.
//!
//! # Value Objects with Invariants
//!
//! - [`Hostname`] - DNS-validated host names (RFC 1123)
//! - [`IpAddressWithCidr`] - IPv4/IPv6 with optional CIDR prefix
//! - [`MacAddress`] - 48-bit MAC address validation
//! - [`SpaceAddress`] - address value tagged with a [`Scope`]
//!
//! # Store Snapshots
//!
//! - [`EndpointBindings`] - endpoint → space, with an application default
//! - [`UnitInfo`], [`Relation`] - the unit being resolved and its relations

pub mod address;
pub mod binding;
pub mod hostname;
pub mod network;

pub use address::{
    address_values, sort_addresses, InterfaceAddress, InterfaceRecord, Scope, SpaceAddress,
    SpaceAddressBuilder, SpaceId, FAN_INTERFACE_PREFIX,
};
pub use binding::{EndpointBindings, Relation, RelationEndpoint, UnitInfo};
pub use hostname::{Hostname, HostnameError};
pub use network::{egress_subnet_for, IpAddressWithCidr, MacAddress, NetworkError};
