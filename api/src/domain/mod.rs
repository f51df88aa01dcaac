//! Domain layer
//!
//! Contains pure business logic with no external dependencies.
//! - `reports`: report request/result models and per-domain category enums
//! - `ports`: trait definitions for external dependencies

pub mod ports;
pub mod reports;
