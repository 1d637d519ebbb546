//! Historial de flota
//!
//! Timeline append-only por vehículo. La escritura es best-effort: un
//! fallo se registra con warn y no aborta la operación que lo originó.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::vehicle_history::{HistoryEventKind, NewHistoryEvent, VehicleHistoryEvent};
use crate::repositories::vehicle_history_repository::VehicleHistoryRepository;
use crate::services::time_accounting;
use crate::utils::errors::AppResult;

pub struct VehicleHistoryService {
    repository: VehicleHistoryRepository,
}

impl VehicleHistoryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleHistoryRepository::new(pool),
        }
    }

    /// Registra un evento; si start y end están presentes calcula la
    /// permanencia en días fraccionarios
    pub async fn record_event(
        &self,
        vehicle_id: Uuid,
        kind: HistoryEventKind,
        event: NewHistoryEvent,
    ) {
        let dwell_days = match (event.started_at, event.ended_at) {
            (Some(start), Some(end)) => Some(time_accounting::dwell_days(start, end)),
            _ => None,
        };

        if let Err(e) = self
            .repository
            .insert(vehicle_id, kind.as_str(), event, dwell_days)
            .await
        {
            warn!(
                "⚠️ Fallo al escribir historial ({} vehículo {}): {}",
                kind.as_str(),
                vehicle_id,
                e
            );
        }
    }

    pub async fn get_timeline(&self, vehicle_id: Uuid) -> AppResult<Vec<VehicleHistoryEvent>> {
        self.repository.list_by_vehicle(vehicle_id).await
    }
}
