// src/db/ticket_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::TicketStore,
    models::ticket::{NewTicket, Ticket, TicketStatus},
};

const TICKET_COLUMNS: &str = r#"
    id, title, description, status, property_id,
    date_created, date_completed, deleted_at, created_at, updated_at
"#;

// O repositório de tickets, responsável pela tabela 'tickets'
#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for TicketRepository {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets",
            TICKET_COLUMNS
        ))
            .fetch_all(&self.pool)
            .await?;

        Ok(tickets)
    }

    async fn create_ticket(&self, input: NewTicket) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets (title, description, status, property_id, date_created)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.property_id)
            .bind(input.date_created)
            .fetch_one(&self.pool)
            .await?;

        Ok(ticket)
    }

    async fn complete_ticket(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET status = $2, date_completed = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
            .bind(id)
            .bind(TicketStatus::Completed)
            .bind(completed_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TicketNotFound(id))
    }

    async fn soft_delete_ticket(
        &self,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET deleted_at = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
            .bind(id)
            .bind(deleted_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TicketNotFound(id))
    }

    async fn restore_ticket(&self, id: Uuid) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TicketNotFound(id))
    }

    async fn delete_ticket(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::TicketNotFound(id));
        }

        Ok(())
    }
}
