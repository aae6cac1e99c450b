// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scoped Space Addresses
//!
//! An address a unit can advertise, tagged with the scope it is reachable
//! from. Scope drives selection order: public addresses first, machine-local
//! last, and fan overlay addresses behind anything else of equal precedence.
//!
//! # Scope Precedence
//!
//! ```text
//! Public  <  CloudLocal = Unknown = FanLocal  <  MachineLocal
//!                                   (fan sorts last within its tier)
//! ```

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::hostname::Hostname;
use super::network::{IpAddressWithCidr, MacAddress};

/// Interface name prefix carried by fan overlay devices
pub const FAN_INTERFACE_PREFIX: &str = "fan-";

/// Default fan overlay network
const FAN_OVERLAY: IpNet = v4_net(252, 0, 0, 0, 8);

/// Private, shared address space and unique local ranges
const CLOUD_LOCAL_NETWORKS: [IpNet; 5] = [
    v4_net(10, 0, 0, 0, 8),
    v4_net(172, 16, 0, 0, 12),
    v4_net(192, 168, 0, 0, 16),
    v4_net(100, 64, 0, 0, 10),
    IpNet::V6(Ipv6Net::new_assert(Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7)),
];

const fn v4_net(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> IpNet {
    IpNet::V4(Ipv4Net::new_assert(Ipv4Addr::new(a, b, c, d), prefix))
}

/// Reachability scope of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Public,
    #[serde(rename = "local-cloud")]
    CloudLocal,
    #[serde(rename = "local-machine")]
    MachineLocal,
    #[serde(rename = "local-fan")]
    FanLocal,
    Unknown,
}

impl Scope {
    /// Classify a raw address value.
    ///
    /// CIDR values are classified by their network address.
    pub fn derive(value: &str) -> Self {
        if let Ok(parsed) = IpAddressWithCidr::new(value) {
            return Self::derive_ip(&parsed.address());
        }

        match Hostname::new(value) {
            Ok(host) if host.is_localhost() => Scope::MachineLocal,
            Ok(_) => Scope::Public,
            Err(_) => Scope::Unknown,
        }
    }

    fn derive_ip(ip: &IpAddr) -> Self {
        let is_machine_local = match ip {
            IpAddr::V4(v4) => v4.is_loopback() || v4.is_link_local(),
            IpAddr::V6(v6) => v6.is_loopback() || (v6.segments()[0] & 0xffc0) == 0xfe80,
        };
        if is_machine_local {
            return Scope::MachineLocal;
        }

        if FAN_OVERLAY.contains(ip) {
            return Scope::FanLocal;
        }

        if CLOUD_LOCAL_NETWORKS.iter().any(|net| net.contains(ip)) {
            return Scope::CloudLocal;
        }

        Scope::Public
    }

    /// Sort tier; lower is preferred
    pub fn precedence(&self) -> u8 {
        match self {
            Scope::Public => 0,
            Scope::CloudLocal | Scope::FanLocal | Scope::Unknown => 1,
            Scope::MachineLocal => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::CloudLocal => "local-cloud",
            Scope::MachineLocal => "local-machine",
            Scope::FanLocal => "local-fan",
            Scope::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network space identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(String);

impl SpaceId {
    /// Identifier of the space every unbound endpoint lands in
    pub const ALPHA: &'static str = "0";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn alpha() -> Self {
        Self::new(Self::ALPHA)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Address value with scope and optional space membership
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceAddress {
    pub value: String,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceId>,
}

impl SpaceAddress {
    /// Address with a scope derived from its value
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let scope = Scope::derive(&value);
        Self::new_scoped(value, scope)
    }

    pub fn new_scoped(value: impl Into<String>, scope: Scope) -> Self {
        Self {
            value: value.into(),
            scope,
            space: None,
        }
    }

    pub fn in_space(mut self, space: SpaceId) -> Self {
        self.space = Some(space);
        self
    }

    pub fn is_fan(&self) -> bool {
        self.scope == Scope::FanLocal
    }

    pub fn ip(&self) -> Option<IpAddr> {
        IpAddr::from_str(&self.value).ok()
    }

    fn sort_key(&self) -> (u8, bool) {
        (self.scope.precedence(), self.is_fan())
    }
}

impl fmt::Display for SpaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.scope)
    }
}

/// Stable scope-aware sort: more public first, fan after its peers.
pub fn sort_addresses(addrs: &mut [SpaceAddress]) {
    addrs.sort_by_key(SpaceAddress::sort_key);
}

/// Address values in order
pub fn address_values(addrs: &[SpaceAddress]) -> Vec<String> {
    addrs.iter().map(|a| a.value.clone()).collect()
}

/// One address on a link-layer device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
}

impl InterfaceAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cidr: None,
        }
    }

    pub fn with_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.cidr = Some(cidr.into());
        self
    }
}

/// Link-layer device record as reported for a machine or container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub interface_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<MacAddress>,
    pub addresses: Vec<InterfaceAddress>,
}

impl InterfaceRecord {
    pub fn new(interface_name: impl Into<String>, addresses: Vec<InterfaceAddress>) -> Self {
        Self {
            interface_name: interface_name.into(),
            mac_address: None,
            addresses,
        }
    }

    pub fn with_mac(mut self, mac: MacAddress) -> Self {
        self.mac_address = Some(mac);
        self
    }
}

/// Builds sortable addresses from link-layer device records.
///
/// Device records carry no authoritative scope, so the only distinction
/// made is fan overlay (by interface name prefix) versus unknown.
#[derive(Debug, Clone)]
pub struct SpaceAddressBuilder {
    fan_prefix: String,
}

impl Default for SpaceAddressBuilder {
    fn default() -> Self {
        Self::new(FAN_INTERFACE_PREFIX)
    }
}

impl SpaceAddressBuilder {
    pub fn new(fan_prefix: impl Into<String>) -> Self {
        Self {
            fan_prefix: fan_prefix.into(),
        }
    }

    /// One address per interface address, in record order. No deduplication.
    pub fn from_interface_info(&self, records: &[InterfaceRecord]) -> Vec<SpaceAddress> {
        records
            .iter()
            .flat_map(|record| {
                let scope = if record.interface_name.starts_with(&self.fan_prefix) {
                    Scope::FanLocal
                } else {
                    Scope::Unknown
                };
                record
                    .addresses
                    .iter()
                    .map(move |addr| SpaceAddress::new_scoped(addr.address.clone(), scope))
            })
            .collect()
    }
}
