// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        memory_store::MemoryStore,
        store::{PortfolioStore, TenantStore, TicketStore},
        PortfolioRepository, TenantRepository, TicketRepository,
    },
    services::{
        import_service::TenantImportService,
        ticket_service::{TicketService, DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS},
    },
};

// ---
// Configuração (variáveis de ambiente / .env)
// ---
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub ticket_retention_days: i64,
    pub ticket_reap_interval: Duration,
    pub import_property_name: String,
    pub import_file: PathBuf,
    pub import_dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 5,
            ticket_retention_days: DEFAULT_RETENTION_DAYS,
            ticket_reap_interval: Duration::from_secs(3600),
            import_property_name: "Sanctuary Office Park".to_string(),
            import_file: PathBuf::from("./sanctuary_office_park_tenants_import.json"),
            import_dry_run: false,
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Settings {
    /// Lê o `.env` (se existir) e depois o ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        // Só é exigida na hora de conectar (o dry run da importação não usa banco)
        let database_url = lookup("DATABASE_URL").unwrap_or_default();

        let ticket_retention_days =
            parse_or(&lookup, "TICKET_RETENTION_DAYS", defaults.ticket_retention_days)?;
        if !(0..=MAX_RETENTION_DAYS).contains(&ticket_retention_days) {
            anyhow::bail!(
                "TICKET_RETENTION_DAYS deve estar entre 0 e {} (recebido {})",
                MAX_RETENTION_DAYS,
                ticket_retention_days
            );
        }

        let reap_secs = parse_or(
            &lookup,
            "TICKET_REAP_INTERVAL_SECS",
            defaults.ticket_reap_interval.as_secs(),
        )?;

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            ticket_retention_days,
            // interval() entra em pânico com zero
            ticket_reap_interval: Duration::from_secs(reap_secs.max(1)),
            import_property_name: lookup("IMPORT_PROPERTY_NAME")
                .unwrap_or(defaults.import_property_name),
            import_file: lookup("IMPORT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.import_file),
            import_dry_run: parse_or(&lookup, "IMPORT_DRY_RUN", defaults.import_dry_run)?,
        })
    }

    pub fn retention(&self) -> chrono::Duration {
        // Os campos são públicos; fora do intervalo satura em vez de entrar em pânico
        chrono::Duration::try_days(self.ticket_retention_days).unwrap_or(chrono::Duration::MAX)
    }
}

/// Conecta ao banco de dados, usando '?' para propagar erros
pub async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    anyhow::ensure!(!settings.database_url.is_empty(), "DATABASE_URL deve ser definida");

    let db_pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub ticket_service: TicketService,
    pub import_service: TenantImportService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn from_stores(
        settings: Settings,
        tickets: Arc<dyn TicketStore>,
        portfolio: Arc<dyn PortfolioStore>,
        tenants: Arc<dyn TenantStore>,
    ) -> Self {
        let ticket_service = TicketService::new(tickets, settings.retention());
        let import_service = TenantImportService::new(portfolio, tenants);

        Self {
            settings: Arc::new(settings),
            ticket_service,
            import_service,
        }
    }

    pub fn with_pool(settings: Settings, pool: PgPool) -> Self {
        Self::from_stores(
            settings,
            Arc::new(TicketRepository::new(pool.clone())),
            Arc::new(PortfolioRepository::new(pool.clone())),
            Arc::new(TenantRepository::new(pool)),
        )
    }

    pub fn in_memory(settings: Settings, store: Arc<MemoryStore>) -> Self {
        Self::from_stores(settings, store.clone(), store.clone(), store)
    }
}
