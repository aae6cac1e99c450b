// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network info for units in orchestrated containers
//!
//! Ingress is the application's service address. Services are often created
//! after their units, so the address is polled until it lands.

use async_trait::async_trait;
use tracing::Instrument;

use super::{AddressSource, NetworkInfo, NetworkInfoRequest, NetworkInfoResults, RelationNetworks};
use crate::context::BindingContext;
use crate::domain::{sort_addresses, InterfaceRecord, Relation, SpaceAddress, SpaceId};
use crate::errors::NetworkResult;

/// Addresses come from the application's service and the unit's container
#[derive(Debug, Clone)]
pub struct ContainerNetworkInfo {
    ctx: BindingContext,
}

impl ContainerNetworkInfo {
    pub fn new(ctx: BindingContext) -> Self {
        Self { ctx }
    }

    async fn service_ingress(&self) -> NetworkResult<Vec<SpaceAddress>> {
        let application = self.ctx.unit().application.as_str();
        let state = self.ctx.state();
        let mut ingress = self
            .ctx
            .poll_for(move || state.service_addresses(application))
            .await?;
        sort_addresses(&mut ingress);
        Ok(ingress)
    }
}

#[async_trait]
impl AddressSource for ContainerNetworkInfo {
    fn context(&self) -> &BindingContext {
        &self.ctx
    }

    async fn interfaces(&self, _space: &SpaceId) -> NetworkResult<Vec<InterfaceRecord>> {
        self.ctx
            .state()
            .container_interfaces(&self.ctx.unit().name)
            .await
    }

    async fn ingress(
        &self,
        _space: &SpaceId,
        _interfaces: &[InterfaceRecord],
    ) -> NetworkResult<Vec<SpaceAddress>> {
        self.service_ingress().await
    }
}

#[async_trait]
impl NetworkInfo for ContainerNetworkInfo {
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
