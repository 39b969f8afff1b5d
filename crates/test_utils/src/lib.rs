//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! account service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built identities, client profiles, and product rules
//! - `builders`: Builders for requests, parameters, and a mock-backed service
//! - `assertions`: Assertion helpers for account errors and stored accounts
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
