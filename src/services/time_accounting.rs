//! Contabilidad de tiempos de una orden de trabajo
//!
//! Funciones puras sobre los timestamps de la orden y sus pausas.
//! Todas las duraciones se expresan en días fraccionarios y nunca
//! son negativas.

use chrono::{DateTime, Utc};

use crate::models::pause::WorkOrderPause;
use crate::models::work_order::WorkOrder;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Diferencia end - start en días fraccionarios, recortada a >= 0
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        0.0
    } else {
        millis as f64 / MILLIS_PER_DAY
    }
}

/// Tiempo de espera: apertura hasta diagnóstico (o hasta ahora si aún
/// no hay diagnóstico)
pub fn waiting_days(order: &WorkOrder, now: DateTime<Utc>) -> f64 {
    let end = order.diagnosed_at.unwrap_or(now);
    days_between(order.opened_at, end)
}

/// Tiempo de ejecución descontando pausas, None si la ejecución no arrancó.
///
/// Cada pausa aporta solo su porción solapada con la ventana de ejecución;
/// una pausa sin cerrar se recorta al final de la ventana.
pub fn execution_days(
    order: &WorkOrder,
    pauses: &[WorkOrderPause],
    now: DateTime<Utc>,
) -> Option<f64> {
    let window_start = order.execution_started_at?;
    let window_end = order.closed_at.unwrap_or(now);

    let gross = days_between(window_start, window_end);

    let mut paused = 0.0;
    for pause in pauses {
        let pause_start = pause.started_at.max(window_start);
        let pause_end = pause.ended_at.unwrap_or(window_end).min(window_end);
        if pause_end > pause_start {
            paused += days_between(pause_start, pause_end);
        }
    }

    Some((gross - paused).max(0.0))
}

/// Tiempo total de reparación, solo definido para órdenes cerradas
pub fn total_days(order: &WorkOrder) -> Option<f64> {
    order.closed_at.map(|closed| days_between(order.opened_at, closed))
}

/// Permanencia entre dos instantes, misma convención de días fraccionarios
pub fn dwell_days(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    days_between(start, end)
}

/// Las tres duraciones de una orden en un solo cálculo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedDurations {
    pub waiting_days: f64,
    pub execution_days: Option<f64>,
    pub total_repair_days: Option<f64>,
}

pub fn compute_durations(
    order: &WorkOrder,
    pauses: &[WorkOrderPause],
    now: DateTime<Utc>,
) -> ComputedDurations {
    ComputedDurations {
        waiting_days: waiting_days(order, now),
        execution_days: execution_days(order, pauses, now),
        total_repair_days: total_days(order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    fn order_at(opened: DateTime<Utc>) -> WorkOrder {
        WorkOrder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            category: "repair".to_string(),
            priority: "normal".to_string(),
            state: "open".to_string(),
            description: None,
            opened_at: opened,
            diagnosed_at: None,
            execution_started_at: None,
            closed_at: None,
            assigned_mechanic: None,
            responsible: "guard_01".to_string(),
            sla_deadline: None,
            sla_breached: false,
            waiting_days: None,
            execution_days: None,
            total_repair_days: None,
            created_at: opened,
        }
    }

    fn pause_between(
        order: &WorkOrder,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> WorkOrderPause {
        WorkOrderPause {
            id: Uuid::new_v4(),
            work_order_id: order.id,
            created_by: "mech_01".to_string(),
            reason: "awaiting_parts".to_string(),
            started_at: start,
            ended_at: end,
            closed_by: None,
        }
    }

    #[test]
    fn test_execution_discounts_pause_overlap() {
        // Apertura en T0, ejecución T0+2d, cierre T0+5d, pausa de 12h en T0+3d
        let mut order = order_at(t0());
        order.execution_started_at = Some(t0() + Duration::days(2));
        order.closed_at = Some(t0() + Duration::days(5));
        let pause = pause_between(
            &order,
            t0() + Duration::days(3),
            Some(t0() + Duration::hours(84)),
        );

        let exec = execution_days(&order, &[pause], t0() + Duration::days(6)).unwrap();
        assert!((exec - 2.5).abs() < 1e-9);
        assert!((total_days(&order).unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_pause_outside_window_contributes_nothing() {
        let mut order = order_at(t0());
        order.execution_started_at = Some(t0() + Duration::days(2));
        order.closed_at = Some(t0() + Duration::days(4));
        // Pausa anterior al arranque de ejecución
        let pause = pause_between(&order, t0(), Some(t0() + Duration::days(1)));

        let exec = execution_days(&order, &[pause], t0() + Duration::days(5)).unwrap();
        assert!((exec - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_partially_overlapping_pause_is_clipped() {
        let mut order = order_at(t0());
        order.execution_started_at = Some(t0() + Duration::days(2));
        order.closed_at = Some(t0() + Duration::days(4));
        // Empieza 1d antes de la ventana y termina 1d dentro: solo cuenta 1d
        let pause = pause_between(
            &order,
            t0() + Duration::days(1),
            Some(t0() + Duration::days(3)),
        );

        let exec = execution_days(&order, &[pause], t0() + Duration::days(5)).unwrap();
        assert!((exec - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_pause_clips_to_window_end() {
        let mut order = order_at(t0());
        order.execution_started_at = Some(t0() + Duration::days(1));
        let now = t0() + Duration::days(3);
        // Pausa sin cerrar desde T0+2d: descuenta hasta "ahora"
        let pause = pause_between(&order, t0() + Duration::days(2), None);

        let exec = execution_days(&order, &[pause], now).unwrap();
        assert!((exec - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_execution_undefined_without_start() {
        let order = order_at(t0());
        assert_eq!(execution_days(&order, &[], t0() + Duration::days(1)), None);
    }

    #[test]
    fn test_waiting_uses_now_while_undiagnosed() {
        let mut order = order_at(t0());
        let now = t0() + Duration::hours(36);
        assert!((waiting_days(&order, now) - 1.5).abs() < 1e-9);

        order.diagnosed_at = Some(t0() + Duration::days(1));
        assert!((waiting_days(&order, now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_undefined_while_open() {
        let order = order_at(t0());
        assert_eq!(total_days(&order), None);
    }

    #[test]
    fn test_durations_never_negative() {
        let mut order = order_at(t0());
        // diagnosed_at anterior a opened_at (datos sucios importados)
        order.diagnosed_at = Some(t0() - Duration::days(1));
        assert_eq!(waiting_days(&order, t0()), 0.0);
    }
}
