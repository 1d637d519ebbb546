use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::backup::BackupAssignment;

// Request para asignar un vehículo de backup
#[derive(Debug, Deserialize)]
pub struct CreateBackupRequest {
    pub principal_vehicle_id: Uuid,
    pub substitute_vehicle_id: Uuid,
}

// Response de asignación de backup
#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub id: Uuid,
    pub principal_vehicle_id: Uuid,
    pub substitute_vehicle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub active: bool,
}

impl From<BackupAssignment> for BackupResponse {
    fn from(assignment: BackupAssignment) -> Self {
        let active = assignment.is_active();
        Self {
            id: assignment.id,
            principal_vehicle_id: assignment.principal_vehicle_id,
            substitute_vehicle_id: assignment.substitute_vehicle_id,
            started_at: assignment.started_at,
            ended_at: assignment.ended_at,
            created_by: assignment.created_by,
            active,
        }
    }
}
