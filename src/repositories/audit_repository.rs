use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::audit::AuditEntry;
use crate::utils::errors::AppError;

pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) -> Result<AuditEntry, AppError> {
        let entry = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_entries (id, actor, action, entity_type, entity_id, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        actor: &str,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        payload: serde_json::Value,
    ) -> Result<AuditEntry, AppError> {
        let entry = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_entries (id, actor, action, entity_type, entity_id, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(payload)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<AuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT * FROM audit_entries
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
