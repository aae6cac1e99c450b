// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-unit resolution context
//!
//! Everything both deployment strategies share: the unit, its application's
//! endpoint bindings, the model's default egress, how to poll and how to
//! resolve host names. Immutable after construction, so one context can
//! serve concurrent requests for the same unit without locking.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Span};

use crate::domain::{
    EndpointBindings, Hostname, Relation, SpaceAddress, SpaceAddressBuilder, SpaceId, UnitInfo,
};
use crate::errors::{NetworkInfoError, NetworkResult};
use crate::retry::{poll, RetryFactory, RetryPolicy};
use crate::state::{HostResolver, NetworkState};

/// Shared state for one unit's resolution session
#[derive(Clone)]
pub struct BindingContext {
    state: Arc<dyn NetworkState>,
    unit: UnitInfo,
    bindings: EndpointBindings,
    default_egress: Vec<String>,
    retry_factory: RetryFactory,
    resolver: Arc<dyn HostResolver>,
    address_builder: SpaceAddressBuilder,
    span: Span,
}

impl BindingContext {
    pub fn new(
        state: Arc<dyn NetworkState>,
        unit: UnitInfo,
        bindings: EndpointBindings,
        default_egress: Vec<String>,
        retry_factory: RetryFactory,
        resolver: Arc<dyn HostResolver>,
    ) -> Self {
        let span = info_span!("network_info", unit = %unit.name);
        Self {
            state,
            unit,
            bindings,
            default_egress,
            retry_factory,
            resolver,
            address_builder: SpaceAddressBuilder::default(),
            span,
        }
    }

    /// Load unit, bindings and model egress from the store
    pub async fn load(
        state: Arc<dyn NetworkState>,
        unit_name: &str,
        retry_factory: RetryFactory,
        resolver: Arc<dyn HostResolver>,
    ) -> NetworkResult<Self> {
        let unit = state.unit(unit_name).await?;
        let bindings = state.endpoint_bindings(&unit.application).await?;
        let default_egress = state.model_egress_subnets().await?;

        debug!(
            unit = %unit.name,
            application = %unit.application,
            bindings = bindings.len(),
            "loaded binding context"
        );

        Ok(Self::new(
            state,
            unit,
            bindings,
            default_egress,
            retry_factory,
            resolver,
        ))
    }

    /// Replace the span operations are recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_address_builder(mut self, builder: SpaceAddressBuilder) -> Self {
        self.address_builder = builder;
        self
    }

    pub fn state(&self) -> &dyn NetworkState {
        self.state.as_ref()
    }

    pub fn unit(&self) -> &UnitInfo {
        &self.unit
    }

    pub fn bindings(&self) -> &EndpointBindings {
        &self.bindings
    }

    pub fn default_egress(&self) -> &[String] {
        &self.default_egress
    }

    pub fn address_builder(&self) -> &SpaceAddressBuilder {
        &self.address_builder
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// A fresh policy for one poll
    pub fn retry_policy(&self) -> RetryPolicy {
        (self.retry_factory)()
    }

    /// Relation by id and the name of this unit's endpoint in it
    pub async fn relation_endpoint(&self, relation_id: i64) -> NetworkResult<(Relation, String)> {
        let relation = self.state.relation(relation_id).await?;
        let endpoint = relation.endpoint(&self.unit.application)?.name.clone();
        Ok((relation, endpoint))
    }

    /// Space bound to `endpoint`, falling back to the default binding
    pub fn bound_space(&self, endpoint: &str) -> Option<SpaceId> {
        self.bindings.bound_space(endpoint).cloned()
    }

    /// Like [`Self::bound_space`] but missing bindings are `NotFound`
    pub fn require_bound_space(&self, endpoint: &str) -> NetworkResult<SpaceId> {
        self.bound_space(endpoint).ok_or_else(|| {
            NetworkInfoError::not_found(format!(
                "binding for endpoint {endpoint:?} of application {:?}",
                self.unit.application
            ))
        })
    }

    /// Poll `fetch` under a fresh retry policy
    pub async fn poll_for<T, F, Fut>(&self, fetch: F) -> NetworkResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = NetworkResult<T>>,
    {
        let policy = self.retry_policy();
        poll(fetch, &policy).await
    }

    /// Public, else private, address of the unit for a cross-model relation.
    ///
    /// Returns nothing for relations within one deployment model. Failures
    /// are logged and never returned: missing addresses are expected while
    /// the model converges.
    pub async fn cross_model_address(&self, relation: &Relation) -> Vec<SpaceAddress> {
        if !relation.cross_model {
            return Vec::new();
        }

        let unit = self.unit.name.as_str();
        match self
            .poll_for(move || self.state.unit_public_address(unit))
            .await
        {
            Ok(addr) if !addr.value.is_empty() => return vec![addr],
            Ok(_) => {}
            Err(err) => warn!(
                unit,
                relation = %relation,
                error = %err,
                "no public address for unit in cross model relation, will use private address"
            ),
        }

        match self
            .poll_for(move || self.state.unit_private_address(unit))
            .await
        {
            Ok(addr) if !addr.value.is_empty() => vec![addr],
            Ok(_) => Vec::new(),
            Err(err) => {
                warn!(unit, relation = %relation, error = %err, "no private address for unit in relation");
                Vec::new()
            }
        }
    }

    /// Explicit relation egress, falling back to the model default, then to
    /// inference from `ingress`.
    pub async fn egress_for_relation(
        &self,
        relation: &Relation,
        ingress: &[SpaceAddress],
    ) -> NetworkResult<Vec<String>> {
        let explicit = match self.state.relation_egress_subnets(&relation.key).await {
            Ok(subnets) => subnets,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };

        Ok(crate::egress::resolve_egress(
            &explicit,
            &self.default_egress,
            ingress,
        ))
    }

    /// Replace host name values with the IPs they resolve to.
    ///
    /// Resolved addresses keep the host name's scope and space. Lookup
    /// failures are logged and the host name is kept.
    pub async fn resolve_host_names(&self, addrs: Vec<SpaceAddress>) -> Vec<SpaceAddress> {
        let mut resolved = Vec::with_capacity(addrs.len());
        for addr in addrs {
            if addr.ip().is_some() || Hostname::new(addr.value.as_str()).is_err() {
                resolved.push(addr);
                continue;
            }

            match self.resolver.lookup_host(&addr.value).await {
                Ok(ips) if !ips.is_empty() => {
                    debug!(host = %addr.value, ?ips, "resolved ingress host name");
                    resolved.extend(ips.into_iter().map(|ip| SpaceAddress {
                        value: ip,
                        scope: addr.scope,
                        space: addr.space.clone(),
                    }));
                }
                Ok(_) => {
                    warn!(host = %addr.value, "host name resolved to no addresses");
                    resolved.push(addr);
                }
                Err(err) => {
                    warn!(host = %addr.value, error = %err, "unable to resolve host name");
                    resolved.push(addr);
                }
            }
        }
        resolved
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("unit", &self.unit)
            .field("bindings", &self.bindings)
            .field("default_egress", &self.default_egress)
            .finish_non_exhaustive()
    }
}
