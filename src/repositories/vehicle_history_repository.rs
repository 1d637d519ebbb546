use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle_history::{NewHistoryEvent, VehicleHistoryEvent};
use crate::utils::errors::AppError;

pub struct VehicleHistoryRepository {
    pool: PgPool,
}

impl VehicleHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        vehicle_id: Uuid,
        kind: &str,
        event: NewHistoryEvent,
        dwell_days: Option<f64>,
    ) -> Result<VehicleHistoryEvent, AppError> {
        let inserted = sqlx::query_as::<_, VehicleHistoryEvent>(
            r#"
            INSERT INTO vehicle_history_events
                (id, vehicle_id, kind, work_order_id, backup_id, actor,
                 status_before, status_after, started_at, ended_at,
                 dwell_days, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(kind)
        .bind(event.work_order_id)
        .bind(event.backup_id)
        .bind(event.actor)
        .bind(event.status_before)
        .bind(event.status_after)
        .bind(event.started_at)
        .bind(event.ended_at)
        .bind(dwell_days)
        .bind(event.details.unwrap_or_else(|| serde_json::json!({})))
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    pub async fn list_by_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<VehicleHistoryEvent>, AppError> {
        let events = sqlx::query_as::<_, VehicleHistoryEvent>(
            r#"
            SELECT * FROM vehicle_history_events
            WHERE vehicle_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
