//! Modelo de BackupAssignment
//!
//! Sustitución temporal de un vehículo mientras el titular está en taller.
//! Un vehículo solo puede ser sustituto en una asignación activa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Asignación de backup - mapea a la tabla backup_assignments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BackupAssignment {
    pub id: Uuid,
    pub principal_vehicle_id: Uuid,
    pub substitute_vehicle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl BackupAssignment {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}
