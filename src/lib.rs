//! Network info resolution for the Composable Information Machine
//!
//! Resolves, for a unit managed by the control plane, which addresses it
//! should advertise for ingress and which subnets it egresses from, per
//! endpoint binding and per relation. Machine-assigned and container units
//! share one policy and differ only in where addresses come from.
//!
//! The backing store is consumed through [`NetworkState`]; nothing here
//! writes to it.

pub mod address_set;
pub mod config;
pub mod context;
pub mod domain;
pub mod egress;
pub mod errors;
pub mod retry;
pub mod state;
pub mod strategy;

// Re-export commonly used types
pub use config::NetworkInfoConfig;
pub use context::BindingContext;
pub use domain::{EndpointBindings, Relation, Scope, SpaceAddress, SpaceId, UnitInfo};
pub use egress::{resolve_egress, EgressSource};
pub use errors::{ErrorKind, NetworkInfoError, NetworkResult};
pub use retry::{poll, Clock, ManualClock, RetryFactory, RetryPolicy, WallClock};
pub use state::{DnsResolver, HostResolver, NetworkState};
pub use strategy::{
    new_network_info, new_network_info_for_strategy, new_network_info_from_config,
    ContainerNetworkInfo, MachineNetworkInfo, NetworkInfo, NetworkInfoRequest, NetworkInfoResult,
    NetworkInfoResults, RelationNetworks,
};
