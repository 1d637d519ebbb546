use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::vehicle_history::VehicleHistoryEvent;

// Response de evento del timeline de un vehículo
#[derive(Debug, Serialize)]
pub struct HistoryEventResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub kind: String,
    pub work_order_id: Option<Uuid>,
    pub backup_id: Option<Uuid>,
    pub actor: Option<String>,
    pub status_before: Option<String>,
    pub status_after: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub dwell_days: Option<f64>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleHistoryEvent> for HistoryEventResponse {
    fn from(event: VehicleHistoryEvent) -> Self {
        Self {
            id: event.id,
            vehicle_id: event.vehicle_id,
            kind: event.kind,
            work_order_id: event.work_order_id,
            backup_id: event.backup_id,
            actor: event.actor,
            status_before: event.status_before,
            status_after: event.status_after,
            started_at: event.started_at,
            ended_at: event.ended_at,
            dwell_days: event.dwell_days,
            details: event.details,
            created_at: event.created_at,
        }
    }
}
