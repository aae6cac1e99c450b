// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host names found in ingress values
//!
//! Container services in particular may advertise a DNS name instead of an
//! address. Only values that pass RFC 1123 validation are handed to the host
//! resolver; IP literals are never host names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostnameError {
    #[error("Host name is empty")]
    Empty,

    #[error("Host name is {0} characters long (limit 253)")]
    TooLong(usize),

    #[error("Invalid label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("Last label {0:?} is all digits")]
    NumericLabel(String),

    #[error("{0} is an IP address")]
    IpLiteral(String),
}

/// RFC 1123 host name.
///
/// A single trailing dot is accepted. The last label may not be all digits,
/// so dotted quads never qualify.
///
/// ```rust
/// use cim_network_info::domain::Hostname;
///
/// assert!(Hostname::new("svc.example.com").is_ok());
/// assert!(Hostname::new("10.0.0.1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    pub fn new(value: impl AsRef<str>) -> Result<Self, HostnameError> {
        value.as_ref().parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `localhost` and its subdomains never leave the machine
    pub fn is_localhost(&self) -> bool {
        let name = self.0.trim_end_matches('.').to_ascii_lowercase();
        name == "localhost" || name.ends_with(".localhost")
    }
}

fn check_label(label: &str) -> Result<(), HostnameError> {
    let reason = if label.is_empty() {
        Some("empty")
    } else if label.len() > MAX_LABEL_LEN {
        Some("longer than 63 characters")
    } else if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        Some("only letters, digits and hyphens are allowed")
    } else if label.starts_with('-') || label.ends_with('-') {
        Some("starts or ends with a hyphen")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(HostnameError::InvalidLabel {
            label: label.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

impl FromStr for Hostname {
    type Err = HostnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HostnameError::Empty);
        }
        if s.parse::<IpAddr>().is_ok() {
            return Err(HostnameError::IpLiteral(s.to_string()));
        }
        if s.len() > MAX_NAME_LEN {
            return Err(HostnameError::TooLong(s.len()));
        }

        let labels: Vec<&str> = s.strip_suffix('.').unwrap_or(s).split('.').collect();
        for label in &labels {
            check_label(label)?;
        }
        if let Some(last) = labels.last() {
            if last.bytes().all(|b| b.is_ascii_digit()) {
                return Err(HostnameError::NumericLabel(last.to_string()));
            }
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Hostname {
    type Error = HostnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hostname> for String {
    fn from(host: Hostname) -> Self {
        host.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
