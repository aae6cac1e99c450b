// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-network-info
//!
//! An in-memory [`NetworkState`] with deterministic data. Addresses can be
//! configured to "land" only after a number of fetches, which together with
//! [`ManualClock`] lets polling be exercised without real time passing.
//!
//! # Fixture Model
//! - Unit `wordpress/0` of application `wordpress`
//! - Bindings: default → `alpha`, `db` → `db-space`, `monitoring` → `broken-space`
//! - `alpha` has a fan device listed before `eth0`
//! - `broken-space` interface lookups fail fatally

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cim_network_info::domain::{InterfaceAddress, InterfaceRecord, MacAddress, RelationEndpoint};
use cim_network_info::{
    EndpointBindings, NetworkInfoConfig, NetworkInfoError, NetworkResult, NetworkState,
    Relation, RetryFactory, SpaceAddress, SpaceId, UnitInfo,
};
use cim_network_info::retry::ManualClock;

pub const UNIT: &str = "wordpress/0";
pub const APPLICATION: &str = "wordpress";

pub const RELATION_ID: i64 = 7;
pub const CROSS_MODEL_RELATION_ID: i64 = 8;

pub const PUBLIC_ADDRESS: &str = "54.10.20.30";
pub const PRIVATE_ADDRESS: &str = "10.0.0.10";

/// An address (or list) that becomes available after `available_after` misses
pub struct AddressSlot<T> {
    value: Option<T>,
    error: Option<NetworkInfoError>,
    available_after: u32,
    calls: AtomicU32,
    kind: &'static str,
}

impl<T: Clone> AddressSlot<T> {
    pub fn missing(kind: &'static str) -> Self {
        Self {
            value: None,
            error: None,
            available_after: 0,
            calls: AtomicU32::new(0),
            kind,
        }
    }

    pub fn ready(kind: &'static str, value: T) -> Self {
        Self {
            value: Some(value),
            ..Self::missing(kind)
        }
    }

    pub fn landing_after(kind: &'static str, value: T, misses: u32) -> Self {
        Self {
            available_after: misses,
            ..Self::ready(kind, value)
        }
    }

    pub fn failing(kind: &'static str, error: NetworkInfoError) -> Self {
        Self {
            error: Some(error),
            ..Self::missing(kind)
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn fetch(&self) -> NetworkResult<T> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match &self.value {
            Some(value) if call > self.available_after => Ok(value.clone()),
            _ => Err(NetworkInfoError::no_address(self.kind)),
        }
    }
}

pub struct InMemoryState {
    pub units: HashMap<String, UnitInfo>,
    pub bindings: HashMap<String, EndpointBindings>,
    pub model_egress: Vec<String>,
    pub relations: HashMap<i64, Relation>,
    pub relation_egress: HashMap<String, Vec<String>>,
    pub relation_egress_error: Option<NetworkInfoError>,
    pub public_address: AddressSlot<SpaceAddress>,
    pub private_address: AddressSlot<SpaceAddress>,
    pub machine_interfaces: HashMap<SpaceId, Vec<InterfaceRecord>>,
    pub machine_interface_errors: HashMap<SpaceId, NetworkInfoError>,
    pub machine_interface_reads: AtomicU32,
    pub container_interfaces: Vec<InterfaceRecord>,
    pub service: AddressSlot<Vec<SpaceAddress>>,
}

impl InMemoryState {
    /// Machine-assigned unit with the standard bindings and interfaces
    pub fn machine() -> Self {
        let mut state = Self::empty(UnitInfo::machine(UNIT, APPLICATION));

        state.machine_interfaces.insert(
            SpaceId::new("alpha"),
            vec![
                InterfaceRecord::new(
                    "fan-252",
                    vec![InterfaceAddress::new("252.0.10.1").with_cidr("252.0.0.0/8")],
                ),
                InterfaceRecord::new(
                    "eth0",
                    vec![
                        InterfaceAddress::new("10.0.0.10").with_cidr("10.0.0.0/24"),
                        InterfaceAddress::new("10.0.0.10").with_cidr("10.0.0.0/24"),
                    ],
                )
                .with_mac(mac("00:16:3e:00:00:01")),
            ],
        );
        state.machine_interfaces.insert(
            SpaceId::new("db-space"),
            vec![InterfaceRecord::new(
                "ens4",
                vec![InterfaceAddress::new("192.168.1.10").with_cidr("192.168.1.0/24")],
            )],
        );
        state.machine_interface_errors.insert(
            SpaceId::new("broken-space"),
            NetworkInfoError::Fatal("link-layer devices unavailable".to_string()),
        );

        state
    }

    /// Container unit with no service address yet
    pub fn container() -> Self {
        let mut state = Self::empty(UnitInfo::container(UNIT, APPLICATION));
        state.container_interfaces = vec![InterfaceRecord::new(
            "",
            vec![InterfaceAddress::new("10.1.1.5")],
        )];
        state
    }

    fn empty(unit: UnitInfo) -> Self {
        let mut units = HashMap::new();
        units.insert(unit.name.clone(), unit);

        let mut bindings = HashMap::new();
        bindings.insert(
            APPLICATION.to_string(),
            EndpointBindings::new()
                .with_default("alpha")
                .with_binding("db", "db-space")
                .with_binding("monitoring", "broken-space"),
        );

        let mut relations = HashMap::new();
        relations.insert(
            RELATION_ID,
            Relation::new(
                RELATION_ID,
                vec![
                    RelationEndpoint::new(APPLICATION, "db"),
                    RelationEndpoint::new("mysql", "server"),
                ],
            ),
        );
        relations.insert(
            CROSS_MODEL_RELATION_ID,
            Relation::new(
                CROSS_MODEL_RELATION_ID,
                vec![
                    RelationEndpoint::new(APPLICATION, "website"),
                    RelationEndpoint::new("haproxy", "reverseproxy"),
                ],
            )
            .cross_model(),
        );

        Self {
            units,
            bindings,
            model_egress: Vec::new(),
            relations,
            relation_egress: HashMap::new(),
            relation_egress_error: None,
            public_address: AddressSlot::missing("public"),
            private_address: AddressSlot::missing("private"),
            machine_interfaces: HashMap::new(),
            machine_interface_errors: HashMap::new(),
            machine_interface_reads: AtomicU32::new(0),
            container_interfaces: Vec::new(),
            service: AddressSlot::missing("service"),
        }
    }

    pub fn relation(&self, id: i64) -> Relation {
        self.relations[&id].clone()
    }

    pub fn machine_interface_reads(&self) -> u32 {
        self.machine_interface_reads.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl NetworkState for InMemoryState {
    async fn unit(&self, unit_name: &str) -> NetworkResult<UnitInfo> {
        self.units
            .get(unit_name)
            .cloned()
            .ok_or_else(|| NetworkInfoError::not_found(format!("unit {unit_name:?}")))
    }

    async fn endpoint_bindings(&self, application: &str) -> NetworkResult<EndpointBindings> {
        self.bindings
            .get(application)
            .cloned()
            .ok_or_else(|| NetworkInfoError::not_found(format!("application {application:?}")))
    }

    async fn model_egress_subnets(&self) -> NetworkResult<Vec<String>> {
        Ok(self.model_egress.clone())
    }

    async fn relation(&self, relation_id: i64) -> NetworkResult<Relation> {
        self.relations
            .get(&relation_id)
            .cloned()
            .ok_or_else(|| NetworkInfoError::not_found(format!("relation {relation_id}")))
    }

    async fn relation_egress_subnets(&self, relation_key: &str) -> NetworkResult<Vec<String>> {
        if let Some(err) = &self.relation_egress_error {
            return Err(err.clone());
        }
        self.relation_egress
            .get(relation_key)
            .cloned()
            .ok_or_else(|| NetworkInfoError::not_found(format!("egress for {relation_key:?}")))
    }

    async fn unit_public_address(&self, _unit_name: &str) -> NetworkResult<SpaceAddress> {
        self.public_address.fetch()
    }

    async fn unit_private_address(&self, _unit_name: &str) -> NetworkResult<SpaceAddress> {
        self.private_address.fetch()
    }

    async fn machine_interfaces(
        &self,
        _unit_name: &str,
        space: &SpaceId,
    ) -> NetworkResult<Vec<InterfaceRecord>> {
        self.machine_interface_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.machine_interface_errors.get(space) {
            return Err(err.clone());
        }
        Ok(self.machine_interfaces.get(space).cloned().unwrap_or_default())
    }

    async fn container_interfaces(&self, _unit_name: &str) -> NetworkResult<Vec<InterfaceRecord>> {
        Ok(self.container_interfaces.clone())
    }

    async fn service_addresses(&self, _application: &str) -> NetworkResult<Vec<SpaceAddress>> {
        self.service.fetch()
    }
}

pub fn mac(value: &str) -> MacAddress {
    MacAddress::new(value).expect("Invalid MAC in test fixture")
}

/// Retry factory with the default delays on a virtual clock
pub fn manual_retry(clock: &ManualClock) -> RetryFactory {
    NetworkInfoConfig::default().retry_factory_with_clock(Arc::new(clock.clone()))
}

/// Resolver that knows a single internal host
pub fn static_resolver(host: &str) -> NetworkResult<Vec<String>> {
    match host {
        "db.internal" => Ok(vec!["10.20.0.5".to_string(), "10.20.0.6".to_string()]),
        _ => Err(NetworkInfoError::not_found(format!("host {host:?}"))),
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
