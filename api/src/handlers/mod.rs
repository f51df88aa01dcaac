//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod auth;
pub mod reports;

pub use auth::login;
pub use reports::{customers_report, inventory_report, sales_report};
