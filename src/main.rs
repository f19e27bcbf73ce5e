use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use user_registry::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use user_registry::database::DatabaseConnection;
use user_registry::repositories::{MemoryStore, PgStore, Store};
use user_registry::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("👤 User Registry API");
    info!("================================================");

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env().context("configuración de base de datos")?;
            let db_connection = match DatabaseConnection::new(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            db_connection.ensure_schema().await?;
            Arc::new(PgStore::new(db_connection.pool().clone()))
        }
        StoreBackend::Memory => {
            warn!("⚠️ Usando almacén en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryStore::new())
        }
    };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("dirección inválida: {}", config.server_url()))?;
    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("👤 Usuarios:");
    info!("   POST/GET /rest-api/users");
    info!("   GET/PUT/DELETE /rest-api/users/:id");
    info!("🏠 Direcciones:");
    info!("   GET  /rest-api/adresses");
    info!("   POST/GET/PUT/DELETE /rest-api/adresses/:user_id");
    info!("📞 Teléfonos:");
    info!("   GET  /rest-api/phones");
    info!("   POST/GET/PUT/DELETE /rest-api/phones/:user_id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
