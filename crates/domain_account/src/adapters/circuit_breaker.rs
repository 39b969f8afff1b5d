//! Circuit breaker shared by the registry adapters
//!
//! After `failure_threshold` consecutive transient failures the circuit opens
//! and calls fail fast. Once `reset_timeout_secs` has elapsed, calls are let
//! through again (half-open); `success_threshold` consecutive successes close
//! the circuit, while a single failure re-opens it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use core_kernel::CircuitBreakerConfig;

#[derive(Debug)]
pub(crate) struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub(crate) fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    /// Returns false while the circuit is open and the reset timeout has not elapsed
    pub(crate) async fn is_available(&self) -> bool {
        if !self.is_open.load(Ordering::Acquire) {
            return true;
        }

        match *self.opened_at.read().await {
            Some(opened) => opened.elapsed() >= Duration::from_secs(self.config.reset_timeout_secs),
            None => true,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Acquire)
    }

    pub(crate) fn record_success(&self) {
        self.failure_count.store(0, Ordering::Release);
        if !self.is_open.load(Ordering::Acquire) {
            return;
        }

        let successes = self.success_count.fetch_add(1, Ordering::AcqRel) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Release);
            self.success_count.store(0, Ordering::Release);
        }
    }

    pub(crate) async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Release);
        let failures = self.failure_count.fetch_add(1, Ordering::AcqRel) + 1;

        // a half-open trial failing re-opens immediately
        if failures >= u64::from(self.config.failure_threshold) || self.is_open.load(Ordering::Acquire) {
            self.is_open.store(true, Ordering::Release);
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}
