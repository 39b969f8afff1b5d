//! Core Kernel - Foundational types shared by every account crate
//!
//! This crate provides the building blocks used across the domain and
//! infrastructure layers:
//! - Strongly-typed identifiers and the client identity value object
//! - Port error type and health-check abstractions for adapters
//! - Common error type for kernel-level failures

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{AccountId, ClientIdentity};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckable, HealthCheckResult,
    CircuitBreakerConfig,
};
pub use error::CoreError;
