//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the account service using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories`] hold the SQL
//! and row types, [`adapters`] implement domain ports on top of them and
//! translate rows to domain models.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresAccountStore};
//!
//! let pool = create_pool(&DatabaseConfig::new("postgres://localhost/accounts")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresAccountStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::AccountRepository;
pub use adapters::PostgresAccountStore;
