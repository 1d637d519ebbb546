//! Modelo de Pause
//!
//! Intervalo durante el cual el reloj de ejecución de una orden queda
//! suspendido. Una orden tiene como máximo una pausa activa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Categoría de la razón de pausa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    AwaitingParts,
    AwaitingAssignment,
    ShiftEnd,
    External,
    Other,
}

impl PauseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PauseReason::AwaitingParts => "awaiting_parts",
            PauseReason::AwaitingAssignment => "awaiting_assignment",
            PauseReason::ShiftEnd => "shift_end",
            PauseReason::External => "external",
            PauseReason::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "awaiting_parts" => Some(PauseReason::AwaitingParts),
            "awaiting_assignment" => Some(PauseReason::AwaitingAssignment),
            "shift_end" => Some(PauseReason::ShiftEnd),
            "external" => Some(PauseReason::External),
            "other" => Some(PauseReason::Other),
            _ => None,
        }
    }
}

/// Pausa de una orden de trabajo - mapea a la tabla work_order_pauses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrderPause {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub created_by: String,
    pub reason: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub closed_by: Option<String>,
}

impl WorkOrderPause {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}
