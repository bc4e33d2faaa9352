//! Support ticket service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{Ticket, TicketStatus, TicketType};

use crate::error::{AppError, AppResult};

/// Support ticket service
#[derive(Clone)]
pub struct TicketService {
    db: PgPool,
}

/// Input for filing a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketInput {
    pub ticket_type: TicketType,
    pub description: String,
}

#[derive(Debug, FromRow)]
struct TicketRow {
    id: Uuid,
    ticket_type: String,
    status: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl TicketRow {
    fn into_ticket(self) -> AppResult<Ticket> {
        let ticket_type = TicketType::parse(&self.ticket_type).ok_or_else(|| {
            AppError::Internal(format!("unknown ticket type in database: {}", self.ticket_type))
        })?;
        let status = TicketStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("unknown ticket status in database: {}", self.status))
        })?;
        Ok(Ticket {
            id: self.id,
            ticket_type,
            status,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

impl TicketService {
    /// Create a new TicketService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// File a ticket; new tickets always start pending
    pub async fn create(&self, input: CreateTicketInput) -> AppResult<Ticket> {
        if input.description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "Description cannot be empty".to_string(),
                message_es: "La descripción no puede estar vacía".to_string(),
            });
        }

        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            INSERT INTO tickets (ticket_type, status, description)
            VALUES ($1, $2, $3)
            RETURNING id, ticket_type, status, description, created_at
            "#,
        )
        .bind(input.ticket_type.as_str())
        .bind(TicketStatus::Pending.as_str())
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        row.into_ticket()
    }

    /// Get a ticket by id
    pub async fn get(&self, ticket_id: Uuid) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, ticket_type, status, description, created_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket".to_string()))?;

        row.into_ticket()
    }

    /// List all tickets, newest first
    pub async fn list(&self) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, ticket_type, status, description, created_at
            FROM tickets
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    /// Update a ticket's status
    pub async fn update_status(&self, ticket_id: Uuid, status: TicketStatus) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            UPDATE tickets
            SET status = $1
            WHERE id = $2
            RETURNING id, ticket_type, status, description, created_at
            "#,
        )
        .bind(status.as_str())
        .bind(ticket_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket".to_string()))?;

        row.into_ticket()
    }
}
