//! Modelo de WorkOrder
//!
//! Este módulo contiene el struct WorkOrder y los enums de estado,
//! categoría y prioridad. Mapea exactamente a la tabla work_orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de una orden de trabajo - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderState {
    Open,
    Diagnosing,
    Executing,
    Paused,
    Qa,
    Closed,
    Void,
}

impl WorkOrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderState::Open => "open",
            WorkOrderState::Diagnosing => "diagnosing",
            WorkOrderState::Executing => "executing",
            WorkOrderState::Paused => "paused",
            WorkOrderState::Qa => "qa",
            WorkOrderState::Closed => "closed",
            WorkOrderState::Void => "void",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(WorkOrderState::Open),
            "diagnosing" => Some(WorkOrderState::Diagnosing),
            "executing" => Some(WorkOrderState::Executing),
            "paused" => Some(WorkOrderState::Paused),
            "qa" => Some(WorkOrderState::Qa),
            "closed" => Some(WorkOrderState::Closed),
            "void" => Some(WorkOrderState::Void),
            _ => None,
        }
    }
}

/// Categoría de la orden - determina el presupuesto SLA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderCategory {
    Maintenance,
    Repair,
    Diagnosis,
    Emergency,
    Other,
}

impl WorkOrderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderCategory::Maintenance => "maintenance",
            WorkOrderCategory::Repair => "repair",
            WorkOrderCategory::Diagnosis => "diagnosis",
            WorkOrderCategory::Emergency => "emergency",
            WorkOrderCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "maintenance" => Some(WorkOrderCategory::Maintenance),
            "repair" => Some(WorkOrderCategory::Repair),
            "diagnosis" => Some(WorkOrderCategory::Diagnosis),
            "emergency" => Some(WorkOrderCategory::Emergency),
            "other" => Some(WorkOrderCategory::Other),
            _ => None,
        }
    }
}

/// Prioridad de la orden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl WorkOrderPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderPriority::Low => "low",
            WorkOrderPriority::Normal => "normal",
            WorkOrderPriority::High => "high",
            WorkOrderPriority::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(WorkOrderPriority::Low),
            "normal" => Some(WorkOrderPriority::Normal),
            "high" => Some(WorkOrderPriority::High),
            "critical" => Some(WorkOrderPriority::Critical),
            _ => None,
        }
    }
}

/// WorkOrder principal - mapea exactamente a la tabla work_orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkOrder {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub category: String,
    pub priority: String,
    pub state: String,
    pub description: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub diagnosed_at: Option<DateTime<Utc>>,
    pub execution_started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub assigned_mechanic: Option<Uuid>,
    pub responsible: String,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub sla_breached: bool,
    pub waiting_days: Option<f64>,
    pub execution_days: Option<f64>,
    pub total_repair_days: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl WorkOrder {
    /// Estado tipado; las filas solo contienen estados conocidos
    pub fn current_state(&self) -> WorkOrderState {
        WorkOrderState::from_str(&self.state).unwrap_or(WorkOrderState::Void)
    }

    /// Categoría tipada; valores desconocidos caen en Other
    pub fn category_kind(&self) -> WorkOrderCategory {
        WorkOrderCategory::from_str(&self.category).unwrap_or(WorkOrderCategory::Other)
    }

    pub fn is_closed(&self) -> bool {
        self.current_state() == WorkOrderState::Closed
    }

    /// Una orden cerrada o anulada ya no admite solicitudes de repuestos
    pub fn accepts_part_requests(&self) -> bool {
        !matches!(
            self.current_state(),
            WorkOrderState::Closed | WorkOrderState::Void
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for state in [
            WorkOrderState::Open,
            WorkOrderState::Diagnosing,
            WorkOrderState::Executing,
            WorkOrderState::Paused,
            WorkOrderState::Qa,
            WorkOrderState::Closed,
            WorkOrderState::Void,
        ] {
            assert_eq!(WorkOrderState::from_str(state.as_str()), Some(state));
        }
        assert_eq!(WorkOrderState::from_str("cancelled"), None);
    }

    #[test]
    fn test_unknown_category_is_unrecognized() {
        assert_eq!(WorkOrderCategory::from_str("bodywork"), None);
    }
}
