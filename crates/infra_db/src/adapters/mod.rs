//! Domain Adapters
//!
//! Implementations of domain ports backed by PostgreSQL.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresAccountStore;
//! use domain_account::AccountStore;
//!
//! let store = PostgresAccountStore::new(pool);
//! let account = store.get_by_account_number("191-0000001").await?;
//! ```

pub mod account;

pub use account::PostgresAccountStore;
