// Copyright (c) 2025 - Cowboy AI, Inc.
//! Backing store and resolver contracts
//!
//! The resolution core only reads. Everything it needs from the store of
//! units, applications, relations and model configuration goes through
//! [`NetworkState`]; host name lookups go through [`HostResolver`].
//!
//! # Error Contract
//!
//! - Lookups by identifier fail with [`NetworkInfoError::NotFound`]
//! - [`NetworkState::relation_egress_subnets`] fails with `NotFound` when the
//!   relation has no egress configured
//! - Address accessors fail with [`NetworkInfoError::NoAddress`] while an
//!   address has not been assigned yet; this is the only kind polling retries

use async_trait::async_trait;
use std::net::IpAddr;

use crate::domain::{EndpointBindings, InterfaceRecord, Relation, SpaceAddress, SpaceId, UnitInfo};
use crate::errors::{NetworkInfoError, NetworkResult};

/// Read accessors over the backing store
#[async_trait]
pub trait NetworkState: Send + Sync {
    /// Unit by name
    async fn unit(&self, unit_name: &str) -> NetworkResult<UnitInfo>;

    /// Endpoint bindings of an application
    async fn endpoint_bindings(&self, application: &str) -> NetworkResult<EndpointBindings>;

    /// Model-wide egress subnets
    async fn model_egress_subnets(&self) -> NetworkResult<Vec<String>>;

    /// Relation by id
    async fn relation(&self, relation_id: i64) -> NetworkResult<Relation>;

    /// Egress subnets configured on a relation, keyed by relation key
    async fn relation_egress_subnets(&self, relation_key: &str) -> NetworkResult<Vec<String>>;

    /// Preferred public address of a unit
    async fn unit_public_address(&self, unit_name: &str) -> NetworkResult<SpaceAddress>;

    /// Preferred private address of a unit
    async fn unit_private_address(&self, unit_name: &str) -> NetworkResult<SpaceAddress>;

    /// Link-layer devices of the unit's machine with addresses in `space`
    async fn machine_interfaces(
        &self,
        unit_name: &str,
        space: &SpaceId,
    ) -> NetworkResult<Vec<InterfaceRecord>>;

    /// Link-layer devices of the unit's container
    async fn container_interfaces(&self, unit_name: &str) -> NetworkResult<Vec<InterfaceRecord>>;

    /// Addresses of the application's exposed service
    async fn service_addresses(&self, application: &str) -> NetworkResult<Vec<SpaceAddress>>;
}

/// Host name → IP address lookup
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn lookup_host(&self, host: &str) -> NetworkResult<Vec<String>>;
}

#[async_trait]
impl<F> HostResolver for F
where
    F: Fn(&str) -> NetworkResult<Vec<String>> + Send + Sync,
{
    async fn lookup_host(&self, host: &str) -> NetworkResult<Vec<String>> {
        self(host)
    }
}

/// System DNS resolution through tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

#[async_trait]
impl HostResolver for DnsResolver {
    async fn lookup_host(&self, host: &str) -> NetworkResult<Vec<String>> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| NetworkInfoError::Fatal(format!("looking up host {host:?}: {e}")))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips.into_iter().map(|ip| ip.to_string()).collect())
    }
}
