// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded polling for addresses that have not landed yet
//!
//! Addresses for cross-model relations and container services are
//! eventually consistent. Rather than failing on the first miss, fetches are
//! retried on a fixed delay until they succeed, fail with a fatal error, or
//! the next sleep would run past the policy's maximum duration.
//!
//! The bound is checked before sleeping: polling stops once
//! `elapsed + delay > max_duration`, so virtual time never passes
//! `max_duration` and the last attempt can land exactly on it.
//!
//! # Timeline (default policy)
//!
//! ```text
//! t=0  fetch → NoAddress → sleep 3s
//! t=3  fetch → NoAddress → sleep 3s
//! ...
//! t=30 fetch → NoAddress → 30s + 3s > 30s → Timeout (11 attempts)
//! ```
//!
//! Time is always read from the policy's [`Clock`], never from the system
//! directly, so tests drive it with a [`ManualClock`].

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::errors::{NetworkInfoError, NetworkResult};

/// Default delay between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Default bound on total polling time
pub const DEFAULT_RETRY_MAX_DURATION: Duration = Duration::from_secs(30);

/// Time source for polling
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Suspend for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

#[async_trait]
impl Clock for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock for deterministic tests.
///
/// `sleep` returns immediately after advancing virtual time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    state: Arc<Mutex<ManualClockState>>,
}

#[derive(Debug, Default)]
struct ManualClockState {
    elapsed: Duration,
    sleeps: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(ManualClockState::default())),
        }
    }

    /// Move virtual time forward
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.elapsed += duration;
    }

    /// Virtual time since construction
    pub fn elapsed(&self) -> Duration {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).elapsed
    }

    /// Number of completed `sleep` calls
    pub fn sleeps(&self) -> u32 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).sleeps
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.elapsed += duration;
        state.sleeps += 1;
    }
}

/// Decides whether a fetch error aborts polling
pub type FatalClassifier = Arc<dyn Fn(&NetworkInfoError) -> bool + Send + Sync>;

/// Produces a fresh policy for every poll
pub type RetryFactory = Arc<dyn Fn() -> RetryPolicy + Send + Sync>;

/// Polling policy: clock, fixed delay, total bound and fatal classifier
#[derive(Clone)]
pub struct RetryPolicy {
    pub clock: Arc<dyn Clock>,
    pub delay: Duration,
    pub max_duration: Duration,
    pub is_fatal: FatalClassifier,
}

impl RetryPolicy {
    pub fn new(clock: Arc<dyn Clock>, delay: Duration, max_duration: Duration) -> Self {
        Self {
            clock,
            delay,
            max_duration,
            is_fatal: no_address_is_transient(),
        }
    }

    pub fn with_classifier(mut self, is_fatal: FatalClassifier) -> Self {
        self.is_fatal = is_fatal;
        self
    }
}

impl Default for RetryPolicy {
    /// Wall clock, 3s delay, 30s bound, only `NoAddress` retries
    fn default() -> Self {
        Self::new(
            Arc::new(WallClock),
            DEFAULT_RETRY_DELAY,
            DEFAULT_RETRY_MAX_DURATION,
        )
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("delay", &self.delay)
            .field("max_duration", &self.max_duration)
            .finish_non_exhaustive()
    }
}

/// Classifier treating only the "no address assigned" kind as transient
pub fn no_address_is_transient() -> FatalClassifier {
    Arc::new(|err: &NetworkInfoError| !err.is_no_address())
}

/// Factory returning [`RetryPolicy::default`]
pub fn default_retry_factory() -> RetryFactory {
    Arc::new(RetryPolicy::default)
}

/// Call `fetch` until it succeeds, fails fatally or time runs out.
///
/// Returns the first success, the first fatal error unchanged, or
/// [`NetworkInfoError::Timeout`] wrapping the last transient error.
pub async fn poll<T, F, Fut>(mut fetch: F, policy: &RetryPolicy) -> NetworkResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = NetworkResult<T>>,
{
    let start = policy.clock.now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let err = match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if (policy.is_fatal)(&err) {
            debug!(attempts, error = %err, "fatal error while polling");
            return Err(err);
        }

        let elapsed = policy.clock.now().saturating_duration_since(start);
        if elapsed + policy.delay > policy.max_duration {
            return Err(NetworkInfoError::Timeout {
                attempts,
                elapsed,
                last: Box::new(err),
            });
        }

        debug!(attempts, error = %err, delay = ?policy.delay, "retrying");
        policy.clock.sleep(policy.delay).await;
    }
}
