//! Route definitions for the Inventory Management Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - own profile
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .route_layer(middleware::from_fn(auth_middleware)),
        )
        // Protected routes - user administration
        .nest("/users", user_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - inventory ledger and shortfalls
        .nest("/inventory", inventory_routes())
        // Protected routes - support tickets
        .nest("/tickets", ticket_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// User administration routes (protected, admin checks in handlers)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/:user_id/role", put(handlers::change_user_role))
        .route("/:user_id/status", put(handlers::set_user_active))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:product_id/stock",
            get(handlers::get_product_stock).put(handlers::adjust_product_stock),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        // Movement ledger
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::record_entry),
        )
        .route("/entries/:entry_id", delete(handlers::delete_entry))
        .route(
            "/exits",
            get(handlers::list_exits).post(handlers::record_exit),
        )
        .route("/exits/:exit_id", delete(handlers::delete_exit))
        // Shortfall registry (read side)
        .route("/shortfalls", get(handlers::list_shortfalls))
        // Dashboard report
        .route("/report", get(handlers::get_inventory_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Support ticket routes (protected)
fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/:ticket_id", get(handlers::get_ticket))
        .route("/:ticket_id/status", put(handlers::update_ticket_status))
        .route_layer(middleware::from_fn(auth_middleware))
}
