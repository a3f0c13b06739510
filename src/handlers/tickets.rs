// src/handlers/tickets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, common::timestamp, config::AppState};

// ---
// 1. "Payloads"
// ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    // Filtro da propriedade selecionada no front (opcional)
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketPayload {
    #[validate(length(min = 1, message = "O título do ticket é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    pub property_id: Option<Uuid>,
    // Aceita qualquer formato de data que o front mandar
    #[serde(default, deserialize_with = "timestamp::flexible_option::deserialize")]
    pub date_created: Option<DateTime<Utc>>,
}

// ---
// 2. Handlers
// ---

// GET /api/tickets/board?propertyId=
pub async fn get_board(
    State(app_state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let board = app_state.ticket_service.board(query.property_id).await?;
    Ok((StatusCode::OK, Json(board)))
}

// POST /api/tickets
pub async fn create_ticket(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTicketPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ticket = app_state
        .ticket_service
        .create_ticket(
            payload.title.trim(),
            payload.description.as_deref(),
            payload.property_id,
            payload.date_created,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

// POST /api/tickets/{id}/complete
pub async fn complete_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = app_state.ticket_service.complete_ticket(id).await?;
    Ok((StatusCode::OK, Json(ticket)))
}

// DELETE /api/tickets/{id}  (vai para a lixeira)
pub async fn soft_delete_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = app_state.ticket_service.soft_delete_ticket(id).await?;
    Ok((StatusCode::OK, Json(ticket)))
}

// POST /api/tickets/{id}/restore
pub async fn restore_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = app_state.ticket_service.restore_ticket(id).await?;
    Ok((StatusCode::OK, Json(ticket)))
}

// DELETE /api/tickets/{id}/purge  (remoção definitiva)
pub async fn purge_ticket(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.ticket_service.purge_ticket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/tickets/reap
pub async fn reap_tickets(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.ticket_service.reap_expired(Utc::now()).await?;
    Ok((StatusCode::OK, Json(outcome)))
}
