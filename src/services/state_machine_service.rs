//! Máquina de estados de órdenes de trabajo
//!
//! Valida y ejecuta transiciones contra una tabla de adyacencia fija.
//! Cada transición corre en una transacción con lock de fila sobre la
//! orden; la auditoría va en la misma transacción y los canales laterales
//! (historial, notificaciones) se despachan tras el commit.

use chrono::Utc;
use lazy_static::lazy_static;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::models::auth::ActorInfo;
use crate::models::pause::{PauseReason, WorkOrderPause};
use crate::models::vehicle::VehicleStatus;
use crate::models::vehicle_history::{HistoryEventKind, NewHistoryEvent};
use crate::models::work_order::{WorkOrder, WorkOrderCategory, WorkOrderPriority, WorkOrderState};
use crate::repositories::pause_repository::PauseRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::audit_service::AuditService;
use crate::services::authorization_service::{AuthorizationService, EngineAction};
use crate::services::notification_service::{NotificationEvent, Notifier};
use crate::services::sla_service;
use crate::services::time_accounting;
use crate::services::vehicle_history_service::VehicleHistoryService;
use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    /// Tabla de adyacencia de la máquina de estados. Un estado ausente
    /// no admite salida alguna (fail-closed).
    static ref TRANSITIONS: HashMap<WorkOrderState, &'static [WorkOrderState]> = {
        use WorkOrderState::*;
        let mut table: HashMap<WorkOrderState, &'static [WorkOrderState]> = HashMap::new();
        table.insert(Open, &[Diagnosing, Void][..]);
        table.insert(Diagnosing, &[Executing, Void][..]);
        table.insert(Executing, &[Paused, Qa, Void][..]);
        // paused -> diagnosing permite diagnosticar órdenes creadas sin mecánico
        table.insert(Paused, &[Executing, Diagnosing, Void][..]);
        table.insert(Qa, &[Closed, Executing, Void][..]);
        // reapertura de una orden cerrada
        table.insert(Closed, &[Executing][..]);
        table
    };
}

/// true si la arista (from, to) está en la tabla; estados desconocidos
/// o terminales no salen a ningún lado
pub fn can_transition(from: WorkOrderState, to: WorkOrderState) -> bool {
    TRANSITIONS
        .get(&from)
        .map(|targets| targets.contains(&to))
        .unwrap_or(false)
}

/// Aplica la transición sobre la orden en memoria. Si la arista no es
/// válida la orden queda intacta.
///
/// Timestamps: diagnosed_at y execution_started_at se estampan solo si
/// estaban vacíos (un ciclo pausa/reanudar o un rechazo de QA no resetea
/// el tiempo transcurrido); el cierre estampa closed_at y calcula las
/// tres duraciones.
pub fn apply_transition(
    order: &mut WorkOrder,
    to: WorkOrderState,
    pauses: &[WorkOrderPause],
    now: chrono::DateTime<chrono::Utc>,
) -> AppResult<()> {
    let from = order.current_state();
    if !can_transition(from, to) {
        return Err(AppError::InvalidTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }

    match to {
        WorkOrderState::Diagnosing => {
            if order.diagnosed_at.is_none() {
                order.diagnosed_at = Some(now);
            }
        }
        WorkOrderState::Executing => {
            if order.execution_started_at.is_none() {
                order.execution_started_at = Some(now);
            }
            // reapertura: la orden vuelve a estar viva
            if from == WorkOrderState::Closed {
                order.closed_at = None;
                order.total_repair_days = None;
            }
        }
        WorkOrderState::Closed => {
            order.closed_at = Some(now);
            let durations = time_accounting::compute_durations(order, pauses, now);
            order.waiting_days = Some(durations.waiting_days);
            order.execution_days = durations.execution_days;
            order.total_repair_days = durations.total_repair_days;
            // una orden cerrada nunca figura como vencida
            order.sla_breached = false;
        }
        _ => {}
    }

    order.state = to.as_str().to_string();
    Ok(())
}

/// Datos de entrada para abrir una orden
#[derive(Debug, Clone)]
pub struct NewWorkOrder {
    pub vehicle_id: Uuid,
    pub category: WorkOrderCategory,
    pub priority: WorkOrderPriority,
    pub description: Option<String>,
    pub assigned_mechanic: Option<Uuid>,
}

pub struct StateMachineService {
    pool: PgPool,
    orders: WorkOrderRepository,
    pauses: PauseRepository,
    vehicles: VehicleRepository,
    audit: AuditService,
    history: VehicleHistoryService,
    authz: AuthorizationService,
    notifier: Notifier,
}

impl StateMachineService {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            orders: WorkOrderRepository::new(pool.clone()),
            pauses: PauseRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            audit: AuditService::new(pool.clone()),
            history: VehicleHistoryService::new(pool.clone()),
            authz: AuthorizationService::new(),
            notifier,
            pool,
        }
    }

    /// Abre una orden. Sin mecánico asignado arranca en paused (bloqueada
    /// a la espera de asignación); con mecánico arranca en open.
    pub async fn create_work_order(
        &self,
        data: NewWorkOrder,
        actor: &ActorInfo,
    ) -> AppResult<WorkOrder> {
        self.authz.ensure_allowed(actor, EngineAction::OpenWorkOrder)?;

        let vehicle = self
            .vehicles
            .find_by_id(data.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehicle with id '{}' not found", data.vehicle_id))
            })?;

        let now = Utc::now();
        let initial_state = if data.assigned_mechanic.is_some() {
            WorkOrderState::Open
        } else {
            WorkOrderState::Paused
        };
        let deadline = sla_service::deadline_for(data.category, now);

        let order = self
            .orders
            .create(
                data.vehicle_id,
                data.category.as_str(),
                data.priority.as_str(),
                initial_state.as_str(),
                data.description,
                data.assigned_mechanic,
                &actor.id,
                Some(deadline),
                now,
            )
            .await?;

        self.audit
            .record(
                actor,
                "work_order.create",
                "work_order",
                order.id,
                json!({
                    "state": order.state,
                    "category": order.category,
                    "sla_deadline": order.sla_deadline,
                }),
            )
            .await;

        // Canales laterales best-effort: el vehículo entra al taller y
        // queda el evento de apertura en su timeline
        if let Err(e) = self.mark_vehicle_in_shop(data.vehicle_id).await {
            warn!("⚠️ No se pudo marcar el vehículo {} en taller: {}", data.vehicle_id, e);
        }
        self.history
            .record_event(
                data.vehicle_id,
                HistoryEventKind::OrderOpened,
                NewHistoryEvent {
                    work_order_id: Some(order.id),
                    actor: Some(actor.id.clone()),
                    status_before: Some(vehicle.vehicle_status.clone()),
                    status_after: Some(VehicleStatus::InShop.as_str().to_string()),
                    started_at: Some(now),
                    ..Default::default()
                },
            )
            .await;
        self.notifier.dispatch(NotificationEvent::new(
            "work_order.opened",
            "work_order",
            order.id,
            json!({ "vehicle_id": order.vehicle_id, "state": order.state }),
        ));

        Ok(order)
    }

    /// Ejecuta una transición en una unidad atómica: lock de fila,
    /// validación, persistencia y auditoría, o nada.
    pub async fn do_transition(
        &self,
        order_id: Uuid,
        to: WorkOrderState,
        actor: &ActorInfo,
    ) -> AppResult<WorkOrder> {
        self.authz
            .ensure_allowed(actor, EngineAction::TransitionWorkOrder)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut order = self
            .orders
            .find_by_id_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Work order with id '{}' not found", order_id))
            })?;

        let previous = order.current_state();
        let pauses = self.pauses.list_for_order_tx(&mut tx, order_id).await?;

        apply_transition(&mut order, to, &pauses, now)?;

        let updated = self.orders.persist_transition(&mut tx, &order).await?;
        self.audit
            .record_tx(
                &mut tx,
                actor,
                "work_order.transition",
                "work_order",
                order_id,
                json!({
                    "previous_state": previous.as_str(),
                    "new_state": to.as_str(),
                }),
            )
            .await;

        tx.commit().await?;

        if to == WorkOrderState::Closed {
            self.history
                .record_event(
                    updated.vehicle_id,
                    HistoryEventKind::OrderClosed,
                    NewHistoryEvent {
                        work_order_id: Some(updated.id),
                        actor: Some(actor.id.clone()),
                        started_at: Some(updated.opened_at),
                        ended_at: updated.closed_at,
                        ..Default::default()
                    },
                )
                .await;
        }
        self.notifier.dispatch(NotificationEvent::new(
            "work_order.transition",
            "work_order",
            updated.id,
            json!({
                "previous_state": previous.as_str(),
                "new_state": to.as_str(),
            }),
        ));

        Ok(updated)
    }

    /// Crea una pausa y lleva la orden a paused en la misma transacción.
    /// Solo vale sobre una orden en ejecución y sin pausa activa.
    pub async fn create_pause(
        &self,
        order_id: Uuid,
        reason: PauseReason,
        actor: &ActorInfo,
    ) -> AppResult<WorkOrderPause> {
        self.authz.ensure_allowed(actor, EngineAction::PauseWorkOrder)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut order = self
            .orders
            .find_by_id_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Work order with id '{}' not found", order_id))
            })?;

        if order.current_state() != WorkOrderState::Executing {
            return Err(AppError::InvariantViolation(format!(
                "Cannot pause a work order in state '{}'",
                order.state
            )));
        }
        if self
            .pauses
            .find_active_for_update(&mut tx, order_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Work order already has an active pause".to_string(),
            ));
        }

        let pause = self
            .pauses
            .insert(&mut tx, order_id, &actor.id, reason.as_str(), now)
            .await?;

        let all_pauses = self.pauses.list_for_order_tx(&mut tx, order_id).await?;
        apply_transition(&mut order, WorkOrderState::Paused, &all_pauses, now)?;
        self.orders.persist_transition(&mut tx, &order).await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "work_order.pause",
                "work_order",
                order_id,
                json!({ "pause_id": pause.id, "reason": pause.reason }),
            )
            .await;

        tx.commit().await?;

        self.notifier.dispatch(NotificationEvent::new(
            "work_order.paused",
            "work_order",
            order_id,
            json!({ "reason": pause.reason }),
        ));

        Ok(pause)
    }

    /// Cierra la pausa activa y reanuda la ejecución en la misma
    /// transacción. Sin pausa activa devuelve NoActivePause.
    pub async fn resume_from_pause(
        &self,
        order_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<WorkOrder> {
        self.authz.ensure_allowed(actor, EngineAction::ResumeWorkOrder)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut order = self
            .orders
            .find_by_id_for_update(&mut tx, order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Work order with id '{}' not found", order_id))
            })?;

        let active = self
            .pauses
            .find_active_for_update(&mut tx, order_id)
            .await?
            .ok_or(AppError::NoActivePause)?;

        self.pauses.close(&mut tx, active.id, &actor.id, now).await?;

        let all_pauses = self.pauses.list_for_order_tx(&mut tx, order_id).await?;
        apply_transition(&mut order, WorkOrderState::Executing, &all_pauses, now)?;
        let updated = self.orders.persist_transition(&mut tx, &order).await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "work_order.resume",
                "work_order",
                order_id,
                json!({ "pause_id": active.id }),
            )
            .await;

        tx.commit().await?;

        self.notifier.dispatch(NotificationEvent::new(
            "work_order.resumed",
            "work_order",
            order_id,
            json!({ "pause_id": active.id }),
        ));

        Ok(updated)
    }

    pub async fn get_order(&self, order_id: Uuid) -> AppResult<WorkOrder> {
        self.orders.find_by_id(order_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Work order with id '{}' not found", order_id))
        })
    }

    pub async fn get_order_pauses(&self, order_id: Uuid) -> AppResult<Vec<WorkOrderPause>> {
        self.pauses.list_for_order(order_id).await
    }

    /// El vehículo titular queda en taller mientras la orden vive
    async fn mark_vehicle_in_shop(&self, vehicle_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        if self
            .vehicles
            .find_by_id_for_update(&mut tx, vehicle_id)
            .await?
            .is_some()
        {
            self.vehicles
                .update_status(&mut tx, vehicle_id, VehicleStatus::InShop.as_str())
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 7, 10, 0, 0).unwrap()
    }

    fn order_in(state: WorkOrderState) -> WorkOrder {
        WorkOrder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            category: "repair".to_string(),
            priority: "normal".to_string(),
            state: state.as_str().to_string(),
            description: None,
            opened_at: t0(),
            diagnosed_at: None,
            execution_started_at: None,
            closed_at: None,
            assigned_mechanic: None,
            responsible: "guard_01".to_string(),
            sla_deadline: Some(t0() + Duration::days(3)),
            sla_breached: false,
            waiting_days: None,
            execution_days: None,
            total_repair_days: None,
            created_at: t0(),
        }
    }

    #[test]
    fn test_adjacency_table() {
        use WorkOrderState::*;

        assert!(can_transition(Open, Diagnosing));
        assert!(can_transition(Diagnosing, Executing));
        assert!(can_transition(Executing, Paused));
        assert!(can_transition(Paused, Executing));
        assert!(can_transition(Executing, Qa));
        assert!(can_transition(Qa, Closed));
        assert!(can_transition(Qa, Executing));
        assert!(can_transition(Closed, Executing));

        assert!(!can_transition(Open, Closed));
        assert!(!can_transition(Open, Executing));
        assert!(!can_transition(Diagnosing, Closed));
        assert!(!can_transition(Closed, Void));
    }

    #[test]
    fn test_void_is_a_dead_end() {
        use WorkOrderState::*;
        for to in [Open, Diagnosing, Executing, Paused, Qa, Closed, Void] {
            assert!(!can_transition(Void, to));
        }
    }

    #[test]
    fn test_void_reachable_from_live_states() {
        use WorkOrderState::*;
        for from in [Open, Diagnosing, Executing, Paused, Qa] {
            assert!(can_transition(from, Void));
        }
    }

    #[test]
    fn test_invalid_transition_leaves_order_untouched() {
        let mut order = order_in(WorkOrderState::Open);
        let before = order.clone();

        let err = apply_transition(&mut order, WorkOrderState::Closed, &[], t0()).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(order.state, before.state);
        assert_eq!(order.closed_at, before.closed_at);
    }

    #[test]
    fn test_diagnosing_stamps_timestamp_once() {
        let mut order = order_in(WorkOrderState::Open);
        apply_transition(&mut order, WorkOrderState::Diagnosing, &[], t0()).unwrap();
        assert_eq!(order.diagnosed_at, Some(t0()));
    }

    #[test]
    fn test_execution_start_is_idempotent() {
        let mut order = order_in(WorkOrderState::Diagnosing);
        apply_transition(&mut order, WorkOrderState::Executing, &[], t0()).unwrap();
        assert_eq!(order.execution_started_at, Some(t0()));

        // pausa y reanudación un día después: el arranque no se pisa
        apply_transition(&mut order, WorkOrderState::Paused, &[], t0() + Duration::days(1))
            .unwrap();
        apply_transition(
            &mut order,
            WorkOrderState::Executing,
            &[],
            t0() + Duration::days(1),
        )
        .unwrap();
        assert_eq!(order.execution_started_at, Some(t0()));
    }

    #[test]
    fn test_qa_rejection_keeps_execution_start() {
        let mut order = order_in(WorkOrderState::Diagnosing);
        apply_transition(&mut order, WorkOrderState::Executing, &[], t0()).unwrap();
        apply_transition(&mut order, WorkOrderState::Qa, &[], t0() + Duration::days(1)).unwrap();
        apply_transition(
            &mut order,
            WorkOrderState::Executing,
            &[],
            t0() + Duration::days(2),
        )
        .unwrap();
        assert_eq!(order.execution_started_at, Some(t0()));
    }

    #[test]
    fn test_close_stamps_and_computes_durations() {
        let mut order = order_in(WorkOrderState::Qa);
        order.diagnosed_at = Some(t0() + Duration::days(1));
        order.execution_started_at = Some(t0() + Duration::days(2));

        let close_at = t0() + Duration::days(5);
        apply_transition(&mut order, WorkOrderState::Closed, &[], close_at).unwrap();

        assert_eq!(order.current_state(), WorkOrderState::Closed);
        assert_eq!(order.closed_at, Some(close_at));
        assert!((order.waiting_days.unwrap() - 1.0).abs() < 1e-9);
        assert!((order.execution_days.unwrap() - 3.0).abs() < 1e-9);
        assert!((order.total_repair_days.unwrap() - 5.0).abs() < 1e-9);
        assert!(!order.sla_breached);
    }

    #[test]
    fn test_close_clears_breach_flag() {
        let mut order = order_in(WorkOrderState::Qa);
        order.execution_started_at = Some(t0());
        order.sla_breached = true;

        apply_transition(&mut order, WorkOrderState::Closed, &[], t0() + Duration::days(9))
            .unwrap();
        assert!(!order.sla_breached);
    }

    #[test]
    fn test_reopen_clears_close_data() {
        let mut order = order_in(WorkOrderState::Qa);
        order.execution_started_at = Some(t0());
        apply_transition(&mut order, WorkOrderState::Closed, &[], t0() + Duration::days(2))
            .unwrap();

        apply_transition(
            &mut order,
            WorkOrderState::Executing,
            &[],
            t0() + Duration::days(3),
        )
        .unwrap();
        assert_eq!(order.closed_at, None);
        assert_eq!(order.total_repair_days, None);
        // el arranque original de ejecución sigue intacto
        assert_eq!(order.execution_started_at, Some(t0()));
    }
}
