//! MySQL adapter
//!
//! SeaORM-backed implementation of the [`ReportGateway`] port.
//!
//! [`ReportGateway`]: crate::domain::ports::ReportGateway

pub mod gateway;

pub use gateway::MySqlGateway;
