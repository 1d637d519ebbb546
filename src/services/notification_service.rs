//! Sumidero de notificaciones
//!
//! Fan-out fire-and-forget hacia un webhook externo. Un fallo de envío
//! se registra y jamás revierte la operación primaria.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Evento que el motor publica tras una operación exitosa
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub kind: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub payload: serde_json::Value,
}

impl NotificationEvent {
    pub fn new(
        kind: &str,
        entity_type: &str,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            payload,
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: NotificationEvent);
}

/// Envía el evento como JSON a un webhook configurado
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify(&self, event: NotificationEvent) {
        let result = self.client.post(&self.url).json(&event).send().await;
        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    "⚠️ Webhook de notificaciones respondió {} para evento '{}'",
                    response.status(),
                    event.kind
                );
            }
            Err(e) => {
                warn!("⚠️ Fallo al notificar evento '{}': {}", event.kind, e);
            }
            _ => {}
        }
    }
}

/// Sin webhook configurado solo deja rastro en el log
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn notify(&self, event: NotificationEvent) {
        debug!("🔕 Notificación descartada (sin webhook): {}", event.kind);
    }
}

/// Handle clonable que despacha en background sin bloquear al caller
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub fn from_config(client: Client, webhook_url: Option<String>) -> Self {
        match webhook_url {
            Some(url) if !url.is_empty() => Self::new(Arc::new(WebhookNotifier::new(client, url))),
            _ => Self::new(Arc::new(NoopNotifier)),
        }
    }

    /// Fire-and-forget: el resultado del envío nunca llega al caller
    pub fn dispatch(&self, event: NotificationEvent) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            sink.notify(event).await;
        });
    }
}
