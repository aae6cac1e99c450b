// Copyright (c) 2025 - Cowboy AI, Inc.
//! Endpoint Bindings, Units and Relations
//!
//! Read-only snapshots of the records the backing store owns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::address::SpaceId;
use crate::errors::{NetworkInfoError, NetworkResult};

/// Endpoint name → space binding for one application.
///
/// The empty endpoint name holds the application-wide default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointBindings(HashMap<String, SpaceId>);

impl EndpointBindings {
    /// Key of the application-wide default binding
    pub const DEFAULT: &'static str = "";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, endpoint: impl Into<String>, space: impl Into<SpaceId>) -> Self {
        self.0.insert(endpoint.into(), space.into());
        self
    }

    pub fn with_default(self, space: impl Into<SpaceId>) -> Self {
        self.with_binding(Self::DEFAULT, space)
    }

    /// Space for `endpoint`, falling back to the default binding
    pub fn bound_space(&self, endpoint: &str) -> Option<&SpaceId> {
        self.0.get(endpoint).or_else(|| self.0.get(Self::DEFAULT))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SpaceId)> for EndpointBindings {
    fn from_iter<I: IntoIterator<Item = (String, SpaceId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Unit snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInfo {
    pub name: String,
    pub application: String,
    /// Machine-provisioned units are assigned to a machine; container units are not
    pub should_be_assigned: bool,
}

impl UnitInfo {
    pub fn machine(name: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            application: application.into(),
            should_be_assigned: true,
        }
    }

    pub fn container(name: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            application: application.into(),
            should_be_assigned: false,
        }
    }
}

/// One side of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEndpoint {
    pub application: String,
    pub name: String,
}

impl RelationEndpoint {
    pub fn new(application: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            name: name.into(),
        }
    }
}

/// Relation snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: i64,
    /// Stable key, e.g. `"wordpress:db mysql:server"`
    pub key: String,
    pub endpoints: Vec<RelationEndpoint>,
    /// The remote application runs under a different deployment model
    pub cross_model: bool,
}

impl Relation {
    pub fn new(id: i64, endpoints: Vec<RelationEndpoint>) -> Self {
        let key = endpoints
            .iter()
            .map(|ep| format!("{}:{}", ep.application, ep.name))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id,
            key,
            endpoints,
            cross_model: false,
        }
    }

    pub fn cross_model(mut self) -> Self {
        self.cross_model = true;
        self
    }

    /// Endpoint used by `application` in this relation
    pub fn endpoint(&self, application: &str) -> NetworkResult<&RelationEndpoint> {
        self.endpoints
            .iter()
            .find(|ep| ep.application == application)
            .ok_or_else(|| {
                NetworkInfoError::not_found(format!(
                    "application {application:?} endpoint in relation {:?}",
                    self.key
                ))
            })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
