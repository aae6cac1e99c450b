// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Strategies
//!
//! Resolves ingress addresses and egress subnets for a unit's endpoint
//! bindings. Two strategies implement [`NetworkInfo`]:
//!
//! - [`MachineNetworkInfo`] for units assigned to provisioned machines
//! - [`ContainerNetworkInfo`] for units running in orchestrated containers
//!
//! They differ only in where raw addresses come from. Space lookup,
//! deduplication and egress policy are shared and live in this module.
//!
//! # Resolution Flow
//!
//! ```text
//! binding → bound space ─┬→ cross-model? → poll public → poll private
//!                        └→ strategy address source (interfaces / service)
//!                                   ↓
//!                          dedupe ingress → egress policy → dedupe egress
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_network_info::{new_network_info, NetworkInfoRequest};
//!
//! let info = new_network_info(state, "wordpress/0").await?;
//! let results = info
//!     .process_request(NetworkInfoRequest::new(["db", "website"]))
//!     .await;
//! for (binding, result) in &results.results {
//!     println!("{binding}: {:?}", result.ingress);
//! }
//! ```

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::address_set::{dedupe_interface_addresses, dedupe_space_addresses, dedupe_strings};
use crate::config::NetworkInfoConfig;
use crate::context::BindingContext;
use crate::domain::{InterfaceRecord, Relation, SpaceAddress, SpaceAddressBuilder, SpaceId};
use crate::egress::resolve_egress;
use crate::errors::{NetworkInfoError, NetworkResult};
use crate::retry::{default_retry_factory, RetryFactory};
use crate::state::{DnsResolver, HostResolver, NetworkState};

pub mod container;
pub mod machine;

pub use container::ContainerNetworkInfo;
pub use machine::MachineNetworkInfo;

/// Bindings to resolve, optionally in the context of one relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfoRequest {
    pub bindings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_id: Option<i64>,
}

impl NetworkInfoRequest {
    pub fn new<I, S>(bindings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bindings: bindings.into_iter().map(Into::into).collect(),
            relation_id: None,
        }
    }

    pub fn with_relation(mut self, relation_id: i64) -> Self {
        self.relation_id = Some(relation_id);
        self
    }
}

/// Network info for one binding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkInfoResult {
    pub space: Option<SpaceId>,
    pub interfaces: Vec<InterfaceRecord>,
    pub ingress: Vec<SpaceAddress>,
    pub egress: Vec<String>,
    pub error: Option<NetworkInfoError>,
}

impl NetworkInfoResult {
    pub fn failed(error: NetworkInfoError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn ingress_values(&self) -> Vec<&str> {
        self.ingress.iter().map(|a| a.value.as_str()).collect()
    }

    /// Drop repeated ingress, egress and per-interface addresses.
    /// Results carrying an error are returned untouched.
    fn normalized(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.ingress = dedupe_space_addresses(self.ingress);
        self.egress = dedupe_strings(self.egress);
        for interface in &mut self.interfaces {
            interface.addresses = dedupe_interface_addresses(std::mem::take(&mut interface.addresses));
        }
        self
    }
}

/// One result per requested binding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkInfoResults {
    pub results: HashMap<String, NetworkInfoResult>,
}

impl NetworkInfoResults {
    pub fn get(&self, binding: &str) -> Option<&NetworkInfoResult> {
        self.results.get(binding)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Bindings that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &NetworkInfoError)> {
        self.results
            .iter()
            .filter_map(|(name, res)| res.error.as_ref().map(|err| (name.as_str(), err)))
    }

    /// Some, but not all, bindings failed
    pub fn is_partial(&self) -> bool {
        let failed = self.failures().count();
        failed > 0 && failed < self.results.len()
    }

    fn all_failed(bindings: &[String], error: &NetworkInfoError) -> Self {
        Self {
            results: bindings
                .iter()
                .map(|name| (name.clone(), NetworkInfoResult::failed(error.clone())))
                .collect(),
        }
    }
}

/// Addresses resolved for a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationNetworks {
    pub space: SpaceId,
    pub ingress: Vec<SpaceAddress>,
    pub egress: Vec<String>,
}

/// Network info operations exposed to the request-handling layer
#[async_trait]
pub trait NetworkInfo: Send + Sync {
    /// Resolve every requested binding independently.
    ///
    /// Always returns one entry per requested binding; per-binding failures
    /// are recorded in that entry's `error`.
    async fn process_request(&self, request: NetworkInfoRequest) -> NetworkInfoResults;

    /// Bound space, ingress and egress for `binding` in `relation`.
    ///
    /// With `poll_public` set, cross-model relations advertise the unit's
    /// public (else private) address instead of space addresses.
    async fn networks_for_relation(
        &self,
        binding: &str,
        relation: &Relation,
        poll_public: bool,
    ) -> NetworkResult<RelationNetworks>;
}

/// Where a deployment model gets its addresses from.
///
/// Interfaces are a plain store read. Ingress may poll, so it is only
/// requested when the caller actually advertises it.
#[async_trait]
pub(crate) trait AddressSource: Send + Sync {
    fn context(&self) -> &BindingContext;

    /// Link-layer devices reported for a binding in `space`
    async fn interfaces(&self, space: &SpaceId) -> NetworkResult<Vec<InterfaceRecord>>;

    /// Ingress candidates in `space`, given the devices already read for it
    async fn ingress(
        &self,
        space: &SpaceId,
        interfaces: &[InterfaceRecord],
    ) -> NetworkResult<Vec<SpaceAddress>>;
}

/// Cross-model relations polled for public addresses skip space addresses
fn uses_cross_model_address(relation: &Relation, poll_public: bool) -> bool {
    relation.cross_model && poll_public
}

/// Deduped ingress and egress for a relation, reusing `interfaces`
async fn relation_addresses<S>(
    source: &S,
    space: &SpaceId,
    relation: &Relation,
    poll_public: bool,
    interfaces: &[InterfaceRecord],
) -> NetworkResult<(Vec<SpaceAddress>, Vec<String>)>
where
    S: AddressSource + ?Sized,
{
    let ctx = source.context();
    let ingress = if uses_cross_model_address(relation, poll_public) {
        ctx.cross_model_address(relation).await
    } else {
        source.ingress(space, interfaces).await?
    };
    let ingress = dedupe_space_addresses(ingress);

    let egress = ctx.egress_for_relation(relation, &ingress).await?;
    Ok((ingress, dedupe_strings(egress)))
}

pub(crate) async fn networks_for_relation<S>(
    source: &S,
    binding: &str,
    relation: &Relation,
    poll_public: bool,
) -> NetworkResult<RelationNetworks>
where
    S: AddressSource + ?Sized,
{
    let space = source.context().require_bound_space(binding)?;
    let interfaces = if uses_cross_model_address(relation, poll_public) {
        Vec::new()
    } else {
        source.interfaces(&space).await?
    };

    let (ingress, egress) =
        relation_addresses(source, &space, relation, poll_public, &interfaces).await?;

    Ok(RelationNetworks {
        space,
        ingress,
        egress,
    })
}

pub(crate) async fn process_request<S>(source: &S, request: NetworkInfoRequest) -> NetworkInfoResults
where
    S: AddressSource + ?Sized,
{
    let ctx = source.context();
    let mut bindings = request.bindings;

    let relation = match request.relation_id {
        None => None,
        Some(id) => match ctx.relation_endpoint(id).await {
            Ok((relation, endpoint)) => {
                if !bindings.contains(&endpoint) {
                    bindings.push(endpoint.clone());
                }
                Some((relation, endpoint))
            }
            Err(err) => return NetworkInfoResults::all_failed(&bindings, &err),
        },
    };
    let bindings = dedupe_strings(bindings);

    let resolved = join_all(bindings.iter().map(|binding| {
        let relation = relation.as_ref();
        async move {
            let result = match resolve_binding(source, binding, relation).await {
                Ok(result) => result.normalized(),
                Err(err) => {
                    debug!(binding = %binding, error = %err, "binding resolution failed");
                    NetworkInfoResult::failed(err)
                }
            };
            (binding.clone(), result)
        }
    }))
    .await;

    NetworkInfoResults {
        results: resolved.into_iter().collect(),
    }
}

/// One binding's entry. The relation's own endpoint takes the relation
/// path; its devices are read once and shared with that path.
async fn resolve_binding<S>(
    source: &S,
    binding: &str,
    relation: Option<&(Relation, String)>,
) -> NetworkResult<NetworkInfoResult>
where
    S: AddressSource + ?Sized,
{
    let ctx = source.context();
    let space = ctx.require_bound_space(binding)?;
    let interfaces = source.interfaces(&space).await?;

    let (ingress, egress) = match relation {
        Some((relation, endpoint)) if endpoint == binding => {
            relation_addresses(source, &space, relation, true, &interfaces).await?
        }
        _ => {
            let ingress = source.ingress(&space, &interfaces).await?;
            let egress = resolve_egress(&[], ctx.default_egress(), &ingress);
            (ingress, egress)
        }
    };

    Ok(NetworkInfoResult {
        space: Some(space),
        interfaces,
        ingress,
        egress,
        error: None,
    })
}

/// Strategy for a loaded context: machine-assigned units get
/// [`MachineNetworkInfo`], everything else [`ContainerNetworkInfo`].
pub fn from_context(ctx: BindingContext) -> Box<dyn NetworkInfo> {
    if ctx.unit().should_be_assigned {
        Box::new(MachineNetworkInfo::new(ctx))
    } else {
        Box::new(ContainerNetworkInfo::new(ctx))
    }
}

/// Network info for a unit with the default retry policy and DNS resolver
pub async fn new_network_info(
    state: Arc<dyn NetworkState>,
    unit_name: &str,
) -> NetworkResult<Box<dyn NetworkInfo>> {
    new_network_info_for_strategy(state, unit_name, default_retry_factory(), Arc::new(DnsResolver))
        .await
}

/// Network info for a unit with injected polling and host resolution
pub async fn new_network_info_for_strategy(
    state: Arc<dyn NetworkState>,
    unit_name: &str,
    retry_factory: RetryFactory,
    resolver: Arc<dyn HostResolver>,
) -> NetworkResult<Box<dyn NetworkInfo>> {
    let ctx = BindingContext::load(state, unit_name, retry_factory, resolver).await?;
    Ok(from_context(ctx))
}

/// Network info for a unit configured from [`NetworkInfoConfig`]
pub async fn new_network_info_from_config(
    state: Arc<dyn NetworkState>,
    unit_name: &str,
    config: &NetworkInfoConfig,
    resolver: Arc<dyn HostResolver>,
) -> NetworkResult<Box<dyn NetworkInfo>> {
    config.validate()?;
    let ctx = BindingContext::load(state, unit_name, config.retry_factory(), resolver)
        .await?
        .with_address_builder(SpaceAddressBuilder::new(config.fan_interface_prefix.clone()));
    Ok(from_context(ctx))
}
