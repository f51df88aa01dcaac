//! Application layer
//!
//! Request validation, the category registry, report executors and the
//! response envelope. Services coordinate between domain types and the
//! storage gateway port.

pub mod customer_service;
pub mod envelope;
pub mod inventory_service;
pub mod registry;
pub(crate) mod rows;
pub mod sales_service;
pub mod validate;

pub use customer_service::CustomerReportService;
pub use envelope::ResponseEnvelope;
pub use inventory_service::InventoryReportService;
pub use registry::Registry;
pub use sales_service::SalesReportService;
pub use validate::{validate_customers, validate_inventory, validate_sales};
