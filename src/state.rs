//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::notification_service::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let http_client = Client::new();
        let notifier =
            Notifier::from_config(http_client.clone(), config.notify_webhook_url.clone());
        log::info!(
            "🔧 AppState inicializado (webhook de notificaciones: {})",
            if config.notify_webhook_url.is_some() { "configurado" } else { "ausente" }
        );
        Self {
            pool,
            config,
            http_client,
            notifier,
        }
    }
}
