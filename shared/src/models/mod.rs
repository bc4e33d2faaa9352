//! Domain models for the Inventory Management Platform

mod movement;
mod product;
mod shortfall;
mod ticket;
mod user;

pub use movement::*;
pub use product::*;
pub use shortfall::*;
pub use ticket::*;
pub use user::*;
