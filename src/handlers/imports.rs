// src/handlers/imports.rs

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{common::error::AppError, config::AppState, models::import::ImportFile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportQuery {
    // Sem o parâmetro, vale IMPORT_PROPERTY_NAME
    pub property_name: Option<String>,
}

// Corpo cru: JSON malformado sai como AppError::ImportFileError, com o mesmo
// formato de erro do resto da API.

// POST /api/imports/tenants
// O "botão de importar" do front: grava de verdade.
pub async fn import_tenants(
    State(app_state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let file = ImportFile::from_json(&body)?;
    let property_name = query
        .property_name
        .unwrap_or_else(|| app_state.settings.import_property_name.clone());

    let report = app_state
        .import_service
        .import(&property_name, &file)
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /api/imports/tenants/preview
pub async fn preview_tenants(
    State(app_state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let file = ImportFile::from_json(&body)?;
    let plan = app_state.import_service.preview(&file);
    Ok((StatusCode::OK, Json(plan)))
}
