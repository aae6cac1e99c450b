// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for network info resolution

use std::time::Duration;
use thiserror::Error;

use crate::domain::NetworkError;

/// Errors that can occur while resolving network info for a unit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkInfoError {
    /// Missing unit, application, relation, endpoint or binding
    #[error("{0} not found")]
    NotFound(String),

    /// Propagated from store access
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested address has not been assigned yet
    #[error("no {0} address assigned")]
    NoAddress(String),

    /// Polling ran out of time without success or a fatal error
    #[error("timed out after {attempts} attempts in {elapsed:?}: {last}")]
    Timeout {
        attempts: u32,
        elapsed: Duration,
        last: Box<NetworkInfoError>,
    },

    /// Any fetch or store failure that must not be retried
    #[error("{0}")]
    Fatal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Value object validation error
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Error classification exposed to the request-handling layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    NoAddress,
    Timeout,
    Fatal,
    Configuration,
}

impl NetworkInfoError {
    /// Shorthand for a `NotFound` error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Shorthand for a `NoAddress` error
    pub fn no_address(which: impl Into<String>) -> Self {
        Self::NoAddress(which.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NoAddress(_) => ErrorKind::NoAddress,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Fatal(_) => ErrorKind::Fatal,
            Self::Configuration(_) | Self::Network(_) => ErrorKind::Configuration,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True only for the distinguished "no address assigned" kind
    pub fn is_no_address(&self) -> bool {
        matches!(self, Self::NoAddress(_))
    }
}

/// Result type for network info operations
pub type NetworkResult<T> = Result<T, NetworkInfoError>;
