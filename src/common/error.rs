use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Propriedade não encontrada: {0}")]
    PropertyNotFound(String),

    #[error("Ticket não encontrado: {0}")]
    TicketNotFound(Uuid),

    #[error("Data inválida: {0}")]
    InvalidTimestamp(String),

    #[error("Arquivo de importação inválido: {0}")]
    ImportFileError(#[from] serde_json::Error),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::PropertyNotFound(name) => (
                StatusCode::NOT_FOUND,
                format!("Propriedade \"{}\" não encontrada. Crie-a primeiro.", name),
            ),
            AppError::TicketNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Ticket {} não encontrado.", id),
            ),
            AppError::InvalidTimestamp(value) => (
                StatusCode::BAD_REQUEST,
                format!("Data inválida: {}", value),
            ),
            AppError::ImportFileError(e) => (
                StatusCode::BAD_REQUEST,
                format!("Arquivo de importação inválido: {}", e),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
