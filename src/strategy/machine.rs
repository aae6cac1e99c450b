// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network info for units on provisioned machines

use async_trait::async_trait;
use tracing::Instrument;

use super::{AddressSource, NetworkInfo, NetworkInfoRequest, NetworkInfoResults, RelationNetworks};
use crate::context::BindingContext;
use crate::domain::{sort_addresses, InterfaceRecord, Relation, SpaceAddress, SpaceId};
use crate::errors::NetworkResult;

/// Addresses come from the link-layer devices of the unit's machine
#[derive(Debug, Clone)]
pub struct MachineNetworkInfo {
    ctx: BindingContext,
}

impl MachineNetworkInfo {
    pub fn new(ctx: BindingContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl AddressSource for MachineNetworkInfo {
    fn context(&self) -> &BindingContext {
        &self.ctx
    }

    async fn interfaces(&self, space: &SpaceId) -> NetworkResult<Vec<InterfaceRecord>> {
        self.ctx
            .state()
            .machine_interfaces(&self.ctx.unit().name, space)
            .await
    }

    /// Device addresses in `space`, scope-sorted, host names resolved
    async fn ingress(
        &self,
        space: &SpaceId,
        interfaces: &[InterfaceRecord],
    ) -> NetworkResult<Vec<SpaceAddress>> {
        let mut ingress: Vec<SpaceAddress> = self
            .ctx
            .address_builder()
            .from_interface_info(interfaces)
            .into_iter()
            .map(|addr| addr.in_space(space.clone()))
            .collect();
        sort_addresses(&mut ingress);
        Ok(self.ctx.resolve_host_names(ingress).await)
    }
}

#[async_trait]
impl NetworkInfo for MachineNetworkInfo {
    async fn process_request(&self, request: NetworkInfoRequest) -> NetworkInfoResults {
        super::process_request(self, request)
            .instrument(self.ctx.span().clone())
            .await
    }

    async fn networks_for_relation(
        &self,
        binding: &str,
        relation: &Relation,
        poll_public: bool,
    ) -> NetworkResult<RelationNetworks> {
        super::networks_for_relation(self, binding, relation, poll_public)
            .instrument(self.ctx.span().clone())
            .await
    }
}
