//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod mysql;

pub use mysql::MySqlGateway;
