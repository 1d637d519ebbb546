//! Sumidero de auditoría
//!
//! Escritor append-only. Un fallo al auditar se registra con un warn
//! tipado y nunca hace fallar la operación que lo disparó.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::models::auth::ActorInfo;
use crate::repositories::audit_repository::AuditRepository;

pub struct AuditService {
    repository: AuditRepository,
}

impl AuditService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AuditRepository::new(pool),
        }
    }

    pub async fn record(
        &self,
        actor: &ActorInfo,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) {
        if let Err(e) = self
            .repository
            .insert(&actor.id, action, entity_type, entity_id, payload)
            .await
        {
            warn!(
                "⚠️ Fallo al escribir auditoría ({} {} {}): {}",
                action, entity_type, entity_id, e
            );
        }
    }

    /// Variante dentro de la transacción de la operación primaria
    pub async fn record_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: &ActorInfo,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) {
        if let Err(e) = self
            .repository
            .insert_tx(tx, &actor.id, action, entity_type, entity_id, payload)
            .await
        {
            warn!(
                "⚠️ Fallo al escribir auditoría ({} {} {}): {}",
                action, entity_type, entity_id, e
            );
        }
    }
}
