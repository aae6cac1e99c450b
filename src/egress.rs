// Copyright (c) 2025 - Cowboy AI, Inc.
//! Egress subnet resolution for relations
//!
//! Sources are consulted in a fixed order and the first non-empty one wins:
//!
//! 1. [`EgressSource::Explicit`] - subnets configured on the relation
//! 2. [`EgressSource::Default`] - model-wide egress subnets
//! 3. [`EgressSource::Inferred`] - derived from the first ingress address
//!
//! Inference only ever looks at the first ingress address. If that value is
//! a host name rather than an IP or CIDR, no egress is reported at all.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::domain::{egress_subnet_for, SpaceAddress};

/// Where a relation's egress subnets came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EgressSource {
    Explicit,
    Default,
    Inferred,
}

impl fmt::Display for EgressSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EgressSource::Explicit => "explicit",
            EgressSource::Default => "default",
            EgressSource::Inferred => "inferred",
        };
        f.write_str(name)
    }
}

/// Pick the egress source and its subnets, or `None` when nothing applies
pub fn select_egress(
    explicit: &[String],
    default_egress: &[String],
    ingress: &[SpaceAddress],
) -> Option<(EgressSource, Vec<String>)> {
    if !explicit.is_empty() {
        return Some((EgressSource::Explicit, explicit.to_vec()));
    }

    if !default_egress.is_empty() {
        return Some((EgressSource::Default, default_egress.to_vec()));
    }

    let first = ingress.first()?;
    match egress_subnet_for(&first.value) {
        Some(subnet) => Some((EgressSource::Inferred, vec![subnet])),
        None => {
            warn!(address = %first.value, "unable to determine egress subnet");
            None
        }
    }
}

/// Egress subnets for a relation; empty when none can be determined
pub fn resolve_egress(
    explicit: &[String],
    default_egress: &[String],
    ingress: &[SpaceAddress],
) -> Vec<String> {
    match select_egress(explicit, default_egress, ingress) {
        Some((source, subnets)) => {
            debug!(%source, ?subnets, "resolved egress subnets");
            subnets
        }
        None => Vec::new(),
    }
}
