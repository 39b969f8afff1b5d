//! REST adapters for the remote registries
//!
//! Each adapter builds one `reqwest::Client` at construction and reuses it for
//! every request. Failures are reported as [`PortError`](core_kernel::PortError)
//! so the account service can tell "no match" from "registry unreachable".

mod circuit_breaker;
mod registry;

pub mod card_registry;
pub mod client_directory;
pub mod product_parameters;

pub use card_registry::CardRegistryClient;
pub use client_directory::ClientDirectoryClient;
pub use product_parameters::ProductParameterClient;
pub use registry::RegistryConfig;
