/// Main Application: middleware de integração HubSpot
///
/// Fluxo:
/// - `/authorize` gera a URL de consentimento e guarda o state no store
/// - `/oauth2callback` valida o state, troca o code e guarda as credenciais
/// - `/credentials` entrega as credenciais uma única vez
/// - `/load` busca contatos e normaliza em `IntegrationItem`

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hubspot_integration_middleware::{config::Settings, handlers, store, utils, AppState};
use utils::{logging::*, mask_secret, AppError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing (RUST_LOG controla o nível)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    settings.hubspot.ensure_credentials().map_err(|e| {
        log_error(&format!("❌ {}", e));
        AppError::ConfigError(e.to_string())
    })?;
    log_info(&format!(
        "🔑 HubSpot client_id: {} | redirect_uri: {}",
        mask_secret(&settings.hubspot.client_id, 6),
        settings.hubspot.redirect_uri
    ));

    // Inicializar key-value store (memória ou Redis)
    let kv_store = store::from_settings(&settings.store).await?;
    log_info(&format!(
        "🗄️ Store inicializado: {:?} (TTL {}s, limpeza a cada {}s)",
        settings.store.backend,
        settings.store.ttl_seconds,
        settings.store.cleanup_interval().as_secs()
    ));

    let host = settings.server.host.clone();
    let port = settings.server.port;

    let app_state = Arc::new(AppState::new(settings, kv_store)?);
    let app = handlers::router(app_state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log_server_startup(port);
    log_server_ready(&addr);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
