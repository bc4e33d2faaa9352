//! Shared types and models for the Inventory Management Platform
//!
//! This crate contains the domain types shared between the backend server
//! and other components of the system (CLI tooling, future frontends).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
