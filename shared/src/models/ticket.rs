//! Support ticket models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A support ticket filed by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub ticket_type: TicketType,
    pub status: TicketStatus,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Ticket categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Support,
    Bug,
    Question,
    Account,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Support => "support",
            TicketType::Bug => "bug",
            TicketType::Question => "question",
            TicketType::Account => "account",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "support" => Some(TicketType::Support),
            "bug" => Some(TicketType::Bug),
            "question" => Some(TicketType::Question),
            "account" => Some(TicketType::Account),
            _ => None,
        }
    }
}

/// Ticket lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TicketStatus::Pending),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}
