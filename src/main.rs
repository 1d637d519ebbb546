use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use chrono::Utc;
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_workshop::config::environment::EnvironmentConfig;
use fleet_workshop::database::DatabaseConnection;
use fleet_workshop::middleware::cors::cors_middleware;
use fleet_workshop::routes;
use fleet_workshop::services::sla_service::SlaService;
use fleet_workshop::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Fleet Workshop - Motor de órdenes de trabajo");
    info!("================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let config = EnvironmentConfig::default();

    // Barrido periódico de SLA (el scheduler real es externo; este tick
    // cubre despliegues sin cron configurado)
    let sla_service = SlaService::new(pool.clone());
    let sweep_interval = config.sla_sweep_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            interval.tick().await;
            if let Err(e) = sla_service.refresh_breach_flags(Utc::now()).await {
                warn!("⚠️ Barrido de SLA falló: {}", e);
            }
        }
    });

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest(
            "/api/work-order",
            routes::work_order_routes::create_work_order_router(),
        )
        .nest(
            "/api/part-request",
            routes::part_request_routes::create_part_request_router(),
        )
        .nest("/api/stock", routes::stock_routes::create_stock_router())
        .nest("/api/backup", routes::backup_routes::create_backup_router())
        .nest("/api/history", routes::history_routes::create_history_router())
        .layer(cors_middleware())
        .with_state(app_state);

    // Puerto del servidor
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔧 Endpoints - Work Order:");
    info!("   POST /api/work-order - Abrir orden de trabajo");
    info!("   GET  /api/work-order/:id - Detalle con pausas y duraciones");
    info!("   POST /api/work-order/:id/transition - Transicionar estado");
    info!("   POST /api/work-order/:id/pause - Pausar ejecución");
    info!("   POST /api/work-order/:id/resume - Reanudar ejecución");
    info!("📦 Endpoints - Part Request:");
    info!("   POST /api/part-request - Solicitar repuestos");
    info!("   POST /api/part-request/:id/approve - Aprobar solicitud");
    info!("   POST /api/part-request/:id/reject - Rechazar solicitud");
    info!("   POST /api/part-request/:id/deliver - Entregar repuestos");
    info!("   GET  /api/part-request/work-order/:id - Solicitudes de una orden");
    info!("🏷️ Endpoints - Stock:");
    info!("   GET  /api/stock/:part_id - Existencias y movimientos");
    info!("   POST /api/stock/:part_id/adjust - Ajustar inventario");
    info!("   POST /api/stock/:part_id/receive - Entrada de mercadería");
    info!("   POST /api/stock/:part_id/consume - Consumo directo");
    info!("🚚 Endpoints - Backup:");
    info!("   POST /api/backup - Asignar vehículo de backup");
    info!("   POST /api/backup/:id/return - Devolver sustituto");
    info!("📜 Endpoints - History:");
    info!("   GET  /api/history/vehicle/:vehicle_id - Timeline del vehículo");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-workshop",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
