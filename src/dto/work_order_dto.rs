use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::pause::WorkOrderPause;
use crate::models::work_order::WorkOrder;
use crate::services::time_accounting::ComputedDurations;

// Request para abrir una orden de trabajo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 3, max = 30))]
    pub category: String,

    pub priority: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub assigned_mechanic: Option<Uuid>,
}

// Request para transicionar una orden
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target_state: String,
}

// Request para pausar una orden
#[derive(Debug, Deserialize)]
pub struct CreatePauseRequest {
    pub reason: String,
}

// Response de orden de trabajo
#[derive(Debug, Serialize)]
pub struct WorkOrderResponse {
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
}

impl From<WorkOrder> for WorkOrderResponse {
    fn from(order: WorkOrder) -> Self {
        Self {
            id: order.id,
            vehicle_id: order.vehicle_id,
            category: order.category,
            priority: order.priority,
            state: order.state,
            description: order.description,
            opened_at: order.opened_at,
            diagnosed_at: order.diagnosed_at,
            execution_started_at: order.execution_started_at,
            closed_at: order.closed_at,
            assigned_mechanic: order.assigned_mechanic,
            responsible: order.responsible,
            sla_deadline: order.sla_deadline,
            sla_breached: order.sla_breached,
            waiting_days: order.waiting_days,
            execution_days: order.execution_days,
            total_repair_days: order.total_repair_days,
        }
    }
}

// Response de pausa
#[derive(Debug, Serialize)]
pub struct PauseResponse {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub created_by: String,
    pub reason: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub closed_by: Option<String>,
}

impl From<WorkOrderPause> for PauseResponse {
    fn from(pause: WorkOrderPause) -> Self {
        Self {
            id: pause.id,
            work_order_id: pause.work_order_id,
            created_by: pause.created_by,
            reason: pause.reason,
            started_at: pause.started_at,
            ended_at: pause.ended_at,
            closed_by: pause.closed_by,
        }
    }
}

// Detalle: orden + pausas + duraciones al momento de la consulta
#[derive(Debug, Serialize)]
pub struct WorkOrderDetailResponse {
    #[serde(flatten)]
    pub order: WorkOrderResponse,
    pub pauses: Vec<PauseResponse>,
    pub live_waiting_days: f64,
    pub live_execution_days: Option<f64>,
}

impl WorkOrderDetailResponse {
    pub fn new(order: WorkOrder, pauses: Vec<WorkOrderPause>, live: ComputedDurations) -> Self {
        Self {
            order: order.into(),
            pauses: pauses.into_iter().map(PauseResponse::from).collect(),
            live_waiting_days: live.waiting_days,
            live_execution_days: live.execution_days,
        }
    }
}
