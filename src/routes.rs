// src/routes.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{config::AppState, handlers};

pub fn app_router(app_state: AppState) -> Router {
    let ticket_routes = Router::new()
        .route("/", post(handlers::tickets::create_ticket))
        .route("/board", get(handlers::tickets::get_board))
        .route("/reap", post(handlers::tickets::reap_tickets))
        .route("/{id}", delete(handlers::tickets::soft_delete_ticket))
        .route("/{id}/complete", post(handlers::tickets::complete_ticket))
        .route("/{id}/restore", post(handlers::tickets::restore_ticket))
        .route("/{id}/purge", delete(handlers::tickets::purge_ticket));

    let import_routes = Router::new()
        .route("/tenants", post(handlers::imports::import_tenants))
        .route("/tenants/preview", post(handlers::imports::preview_tenants));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/tickets", ticket_routes)
        .nest("/api/imports", import_routes)
        .with_state(app_state)
}
