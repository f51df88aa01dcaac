//! Authentication
//!
//! Legacy login collaborator. Kept isolated from the reporting core so
//! report endpoints never depend on it.

pub mod legacy;

pub use legacy::authenticate;
