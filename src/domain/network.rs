// Copyright (c) 2025 - Cowboy AI, Inc.
//! Address and subnet value objects
//!
//! Parsing here is strict: a value that does not parse is not an IP, and the
//! callers decide whether that means "host name" or "garbage".

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Value object parse failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Prefix length {prefix} exceeds {max} for {address}")]
    InvalidPrefixLength { address: IpAddr, prefix: u8, max: u8 },

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),
}

/// An IP address, optionally carrying a network prefix.
///
/// Without a prefix the value behaves as a host route (`/32` or `/128`).
///
/// ```rust
/// use cim_network_info::domain::IpAddressWithCidr;
///
/// let net = IpAddressWithCidr::parse_cidr("192.168.1.0/24").unwrap();
/// assert!(net.contains(&"192.168.1.77".parse().unwrap()));
/// assert_eq!(net.to_string(), "192.168.1.0/24");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpAddressWithCidr {
    network: IpNet,
    has_prefix: bool,
}

impl IpAddressWithCidr {
    /// Parse `addr` or `addr/prefix`
    pub fn new(value: impl AsRef<str>) -> Result<Self, NetworkError> {
        value.as_ref().parse()
    }

    /// Parse `addr/prefix`; a bare address is rejected
    pub fn parse_cidr(value: impl AsRef<str>) -> Result<Self, NetworkError> {
        let parsed: Self = value.as_ref().parse()?;
        if parsed.has_prefix {
            Ok(parsed)
        } else {
            Err(NetworkError::InvalidCidr(value.as_ref().to_string()))
        }
    }

    pub fn with_prefix(address: IpAddr, prefix: u8) -> Result<Self, NetworkError> {
        let network = IpNet::new(address, prefix).map_err(|_| NetworkError::InvalidPrefixLength {
            address,
            prefix,
            max: IpNet::from(address).max_prefix_len(),
        })?;
        Ok(Self {
            network,
            has_prefix: true,
        })
    }

    pub fn address(&self) -> IpAddr {
        self.network.addr()
    }

    pub fn prefix(&self) -> Option<u8> {
        self.has_prefix.then(|| self.network.prefix_len())
    }

    /// Effective prefix, treating a bare address as a host route
    pub fn effective_prefix(&self) -> u8 {
        self.network.prefix_len()
    }

    /// The network this value denotes
    pub fn network(&self) -> IpNet {
        self.network
    }

    /// Whether `ip` falls inside this network. Families never mix.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.network.contains(ip)
    }
}

impl From<IpAddr> for IpAddressWithCidr {
    fn from(address: IpAddr) -> Self {
        Self {
            network: IpNet::from(address),
            has_prefix: false,
        }
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let address: IpAddr = addr
            .parse()
            .map_err(|_| NetworkError::InvalidIpAddress(addr.to_string()))?;

        match prefix {
            None => Ok(Self::from(address)),
            Some(raw) => {
                let prefix = raw
                    .parse::<u8>()
                    .map_err(|_| NetworkError::InvalidCidr(s.to_string()))?;
                Self::with_prefix(address, prefix)
            }
        }
    }
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_prefix {
            write!(f, "{}", self.network)
        } else {
            write!(f, "{}", self.network.addr())
        }
    }
}

/// Egress subnet implied by a single address value.
///
/// CIDR values pass through unchanged. IPv4 becomes `/32`, IPv6 `/128`, and
/// IPv4-mapped IPv6 is written as IPv4 `/32`. Host names yield `None`.
pub fn egress_subnet_for(value: &str) -> Option<String> {
    let parsed = IpAddressWithCidr::new(value).ok()?;
    if parsed.has_prefix {
        return Some(value.to_string());
    }

    let address = match parsed.address() {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    };
    Some(IpNet::from(address).to_string())
}

/// Hardware address of a link-layer device.
///
/// Accepts colon, dash or no separators; always renders as lowercase
/// colon-separated octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(value: impl AsRef<str>) -> Result<Self, NetworkError> {
        value.as_ref().parse()
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetworkError::InvalidMacAddress(s.to_string());

        let hex: String = s.chars().filter(|c| !matches!(c, ':' | '-')).collect();
        if hex.len() != 12 || !hex.is_ascii() {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, i) in octets.iter_mut().zip((0..12).step_by(2)) {
            *octet = u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
