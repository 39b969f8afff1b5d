//! Account Domain
//!
//! This crate decides whether a client may open a financial account and, when
//! eligible, persists it.
//!
//! # Creation flow
//!
//! ```text
//! request ──► resolve client ──► resolve product parameters
//!                                       │
//!          ┌──────────┬──────────┬──────┴─────┬──────────────┐
//!          ▼          ▼          ▼            ▼              ▼
//!     max accounts  holders   signers   account prereq  card prereq
//!          └──────────┴──────────┴──────┬─────┴──────────────┘
//!                                       ▼
//!                         verdict in priority order ──► save
//! ```
//!
//! The five checks are independent and run concurrently; the verdict waits for
//! all of them and reports the first failure in a fixed order, so the same
//! request always fails with the same error.
//!
//! # Examples
//!
//! ```rust
//! use domain_account::eligibility::EligibilityReport;
//! use domain_account::{AccountError, ProductKey, ProductParameter};
//!
//! let parameter = ProductParameter {
//!     key: ProductKey::new("PX", "PERSONAL", "STANDARD"),
//!     max_product: 1,
//!     minimum_holder: 2,
//!     minimum_signer: 1,
//!     account_required: false,
//!     card_required: false,
//! };
//!
//! let report = EligibilityReport {
//!     max_accounts: true,
//!     holders: false,
//!     signers: false,
//!     account_prerequisite: true,
//!     card_prerequisite: true,
//! };
//!
//! // holders outrank signers
//! assert!(matches!(
//!     report.verdict(&parameter),
//!     Err(AccountError::InsufficientHolders { required: 2 })
//! ));
//! ```

pub mod account;
pub mod client;
pub mod product;
pub mod eligibility;
pub mod error;
pub mod ports;
pub mod services;
pub mod adapters;

pub use account::{Account, AccountRequest};
pub use client::ClientProfile;
pub use product::{ProductKey, ProductParameter};
pub use eligibility::{EligibilityCheck, EligibilityReport};
pub use error::{AccountError, ErrorClass};
pub use ports::{AccountStore, CardRegistryPort, ClientDirectoryPort, ProductParameterPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryAccountStore, MockCardRegistry, MockClientDirectory, MockProductParameters};
pub use services::AccountService;
pub use adapters::{CardRegistryClient, ClientDirectoryClient, ProductParameterClient, RegistryConfig};
