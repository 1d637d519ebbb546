//! Política SLA de órdenes de trabajo
//!
//! Cada categoría tiene un presupuesto de días; el deadline se calcula
//! una sola vez a la apertura y nunca se recalcula. Una orden cerrada
//! jamás figura como vencida.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::models::work_order::{WorkOrder, WorkOrderCategory, WorkOrderState};
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::utils::errors::AppResult;

/// Presupuesto de resolución por categoría
pub fn budget_for(category: WorkOrderCategory) -> Duration {
    match category {
        WorkOrderCategory::Maintenance => Duration::days(7),
        WorkOrderCategory::Repair => Duration::days(3),
        WorkOrderCategory::Emergency => Duration::days(1),
        WorkOrderCategory::Diagnosis => Duration::days(2),
        WorkOrderCategory::Other => Duration::days(5),
    }
}

/// Deadline = apertura + presupuesto de la categoría
pub fn deadline_for(category: WorkOrderCategory, opened_at: DateTime<Utc>) -> DateTime<Utc> {
    opened_at + budget_for(category)
}

/// Vencida = pasó el deadline y la orden sigue viva
pub fn is_breached(order: &WorkOrder, now: DateTime<Utc>) -> bool {
    if order.current_state() == WorkOrderState::Closed {
        return false;
    }
    match order.sla_deadline {
        Some(deadline) => now > deadline,
        None => false,
    }
}

/// Barrido periódico que persiste el flag de vencimiento en órdenes vivas.
/// Lo invoca un scheduler externo; el motor solo expone la operación.
pub struct SlaService {
    orders: WorkOrderRepository,
}

impl SlaService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: WorkOrderRepository::new(pool),
        }
    }

    pub async fn refresh_breach_flags(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let overdue = self.orders.find_overdue_unflagged(now).await?;
        let count = overdue.len();

        for order in overdue {
            self.orders.set_sla_breached(order.id, true).await?;
        }

        if count > 0 {
            info!("⏰ {} órdenes marcadas como vencidas de SLA", count);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn order(category: &str, state: &str) -> WorkOrder {
        let opened = t0();
        let kind = WorkOrderCategory::from_str(category).unwrap_or(WorkOrderCategory::Other);
        WorkOrder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            category: category.to_string(),
            priority: "normal".to_string(),
            state: state.to_string(),
            description: None,
            opened_at: opened,
            diagnosed_at: None,
            execution_started_at: None,
            closed_at: None,
            assigned_mechanic: None,
            responsible: "guard_01".to_string(),
            sla_deadline: Some(deadline_for(kind, opened)),
            sla_breached: false,
            waiting_days: None,
            execution_days: None,
            total_repair_days: None,
            created_at: opened,
        }
    }

    #[test]
    fn test_budgets_per_category() {
        assert_eq!(budget_for(WorkOrderCategory::Maintenance), Duration::days(7));
        assert_eq!(budget_for(WorkOrderCategory::Repair), Duration::days(3));
        assert_eq!(budget_for(WorkOrderCategory::Emergency), Duration::days(1));
        assert_eq!(budget_for(WorkOrderCategory::Diagnosis), Duration::days(2));
        assert_eq!(budget_for(WorkOrderCategory::Other), Duration::days(5));
    }

    #[test]
    fn test_maintenance_deadline_is_seven_days() {
        let o = order("maintenance", "open");
        assert_eq!(o.sla_deadline, Some(t0() + Duration::days(7)));
    }

    #[test]
    fn test_breach_only_after_deadline() {
        let o = order("maintenance", "open");
        assert!(!is_breached(&o, t0() + Duration::days(6)));
        assert!(is_breached(&o, t0() + Duration::days(8)));
    }

    #[test]
    fn test_closed_order_is_never_breached() {
        let mut o = order("maintenance", "closed");
        o.closed_at = Some(t0() + Duration::days(30));
        assert!(!is_breached(&o, t0() + Duration::days(30)));
    }

    #[test]
    fn test_unknown_category_gets_default_budget() {
        let kind = WorkOrderCategory::from_str("bodywork").unwrap_or(WorkOrderCategory::Other);
        assert_eq!(budget_for(kind), Duration::days(5));
    }

    #[test]
    fn test_order_without_deadline_is_not_breached() {
        let mut o = order("repair", "open");
        o.sla_deadline = None;
        assert!(!is_breached(&o, t0() + Duration::days(90)));
    }
}
