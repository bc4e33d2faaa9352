//! HTTP handlers for the Inventory Management Platform

mod auth;
mod health;
mod inventory;
mod product;
mod ticket;
mod user;

pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use product::*;
pub use ticket::*;
pub use user::*;
