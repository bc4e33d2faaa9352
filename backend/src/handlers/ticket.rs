//! HTTP handlers for support tickets

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Ticket, TicketStatus};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ticket::CreateTicketInput;
use crate::services::TicketService;
use crate::AppState;

#[derive(Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: TicketStatus,
}

/// File a support ticket
pub async fn create_ticket(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateTicketInput>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let service = TicketService::new(state.db);
    let ticket = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List all tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Ticket>>> {
    let service = TicketService::new(state.db);
    let tickets = service.list().await?;
    Ok(Json(tickets))
}

/// Get a ticket by id
pub async fn get_ticket(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
) -> AppResult<Json<Ticket>> {
    let service = TicketService::new(state.db);
    let ticket = service.get(ticket_id).await?;
    Ok(Json(ticket))
}

/// Update a ticket's status (admin)
pub async fn update_ticket_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<UpdateTicketStatusRequest>,
) -> AppResult<Json<Ticket>> {
    current_user.0.require_admin()?;
    let service = TicketService::new(state.db);
    let ticket = service.update_status(ticket_id, body.status).await?;
    Ok(Json(ticket))
}
