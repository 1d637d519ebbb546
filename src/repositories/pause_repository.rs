use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::pause::WorkOrderPause;
use crate::utils::errors::AppError;

pub struct PauseRepository {
    pool: PgPool,
}

impl PauseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        work_order_id: Uuid,
        created_by: &str,
        reason: &str,
        started_at: DateTime<Utc>,
    ) -> Result<WorkOrderPause, AppError> {
        let pause = sqlx::query_as::<_, WorkOrderPause>(
            r#"
            INSERT INTO work_order_pauses
                (id, work_order_id, created_by, reason, started_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(work_order_id)
        .bind(created_by)
        .bind(reason)
        .bind(started_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(pause)
    }

    /// La pausa activa (ended_at IS NULL) de la orden, si existe
    pub async fn find_active(
        &self,
        work_order_id: Uuid,
    ) -> Result<Option<WorkOrderPause>, AppError> {
        let pause = sqlx::query_as::<_, WorkOrderPause>(
            "SELECT * FROM work_order_pauses WHERE work_order_id = $1 AND ended_at IS NULL",
        )
        .bind(work_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pause)
    }

    pub async fn find_active_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        work_order_id: Uuid,
    ) -> Result<Option<WorkOrderPause>, AppError> {
        let pause = sqlx::query_as::<_, WorkOrderPause>(
            r#"
            SELECT * FROM work_order_pauses
            WHERE work_order_id = $1 AND ended_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(work_order_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(pause)
    }

    pub async fn close(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pause_id: Uuid,
        closed_by: &str,
        ended_at: DateTime<Utc>,
    ) -> Result<WorkOrderPause, AppError> {
        let pause = sqlx::query_as::<_, WorkOrderPause>(
            r#"
            UPDATE work_order_pauses
            SET ended_at = $2, closed_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(pause_id)
        .bind(ended_at)
        .bind(closed_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(pause)
    }

    pub async fn list_for_order(
        &self,
        work_order_id: Uuid,
    ) -> Result<Vec<WorkOrderPause>, AppError> {
        let pauses = sqlx::query_as::<_, WorkOrderPause>(
            "SELECT * FROM work_order_pauses WHERE work_order_id = $1 ORDER BY started_at ASC",
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pauses)
    }

    /// Igual que list_for_order pero dentro de la transacción en curso,
    /// para que el cierre de una orden vea sus pausas comprometidas
    pub async fn list_for_order_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        work_order_id: Uuid,
    ) -> Result<Vec<WorkOrderPause>, AppError> {
        let pauses = sqlx::query_as::<_, WorkOrderPause>(
            "SELECT * FROM work_order_pauses WHERE work_order_id = $1 ORDER BY started_at ASC",
        )
        .bind(work_order_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(pauses)
    }
}
