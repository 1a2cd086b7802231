use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use vehicle_inventory::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use vehicle_inventory::create_app;
use vehicle_inventory::database::{create_pool, run_migrations};
use vehicle_inventory::repositories::{
    InMemoryVehicleRepository, PgVehicleRepository, VehicleRepository,
};
use vehicle_inventory::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Vehicle Inventory API");
    info!("================================================");
    info!(environment = %config.environment, storage = ?config.storage, "⚙️ Configuración cargada");
    if !config.is_development() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío: CORS permisivo fuera de desarrollo");
    }

    let repository: Arc<dyn VehicleRepository> = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match create_pool(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            run_migrations(&pool).await?;
            Arc::new(PgVehicleRepository::new(pool))
        }
        StorageBackend::Memory => {
            info!("🧪 Usando almacenamiento en memoria");
            Arc::new(InMemoryVehicleRepository::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(config, repository));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /vehicle - Listar vehículos");
    info!("   POST   /vehicle - Crear vehículo");
    info!("   GET    /vehicle/:vin - Obtener vehículo");
    info!("   PUT    /vehicle/:vin - Reemplazar vehículo");
    info!("   PATCH  /vehicle/:vin - Actualizar vehículo parcialmente");
    info!("   DELETE /vehicle/:vin - Eliminar vehículo");
    info!("   GET    /vehicle_sold - Listar vehículos vendidos");
    info!("   POST   /vehicle_sold - Registrar venta");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
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
