//! Business logic services for the Inventory Management Platform

pub mod auth;
pub mod inventory;
pub mod product;
pub mod ticket;
pub mod user;

pub use auth::AuthService;
pub use inventory::InventoryService;
pub use product::ProductService;
pub use ticket::TicketService;
pub use user::UserService;
