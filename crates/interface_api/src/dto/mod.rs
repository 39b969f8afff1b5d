//! Request and response bodies

pub mod account;
