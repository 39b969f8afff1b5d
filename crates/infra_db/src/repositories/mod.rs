//! Repository implementations
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain row structs. Queries are built at runtime with `sqlx::query` so the
//! crate compiles without a live database.

pub mod account;

pub use account::AccountRepository;
