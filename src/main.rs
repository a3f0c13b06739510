//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use property_desk::{
    config::{self, AppState, Settings},
    routes::app_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, com "info" por padrão)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let db_pool = config::connect(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let reap_interval = settings.ticket_reap_interval;
    let bind_addr = settings.bind_addr.clone();
    let app_state = AppState::with_pool(settings, db_pool);

    // O expurgo da lixeira roda agendado, fora do caminho de leitura
    app_state.ticket_service.spawn_reaper(reap_interval);

    let app = app_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
