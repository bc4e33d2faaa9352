//! Database models for the Inventory Management Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
