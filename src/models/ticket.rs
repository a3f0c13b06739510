// src/models/ticket.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::timestamp;

// --- ENUMS ---

// Mapeia o CREATE TYPE ticket_status do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Completed,
}

// ---
// Ticket (Chamado de manutenção)
// ---
// `deleted_at` preenchido = "lixeira" (soft-delete). Depois da janela de
// retenção o registro é apagado de vez.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    pub property_id: Option<Uuid>,

    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub date_completed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_soft_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// Dados para criar um ticket novo
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub property_id: Option<Uuid>,
    pub date_created: DateTime<Utc>,
}

// ---
// Quadro de tickets (o que o front desenha)
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BucketKind {
    Active,
    Completed,
    Deleted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyState {
    pub icon: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCard {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub property_id: Option<Uuid>,
    pub date_created: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    // O card da lixeira é desenhado "apagado"
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketView {
    pub kind: BucketKind,
    pub cards: Vec<TicketCard>,
    // Só existe quando `cards` está vazio
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBoard {
    pub active: BucketView,
    pub completed: BucketView,
    pub deleted: BucketView,
}

// Resultado do "reap" (expurgo definitivo)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReapOutcome {
    pub deleted: usize,
    pub failed: usize,
}
