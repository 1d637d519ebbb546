//! Modelo de VehicleHistoryEvent
//!
//! Línea de tiempo append-only por vehículo: aperturas y cierres de
//! órdenes, entregas de repuestos, backups y salidas del taller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de evento del historial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEventKind {
    OrderOpened,
    OrderClosed,
    PartsDelivered,
    BackupAssigned,
    BackupReturned,
    ShopExit,
}

impl HistoryEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryEventKind::OrderOpened => "order_opened",
            HistoryEventKind::OrderClosed => "order_closed",
            HistoryEventKind::PartsDelivered => "parts_delivered",
            HistoryEventKind::BackupAssigned => "backup_assigned",
            HistoryEventKind::BackupReturned => "backup_returned",
            HistoryEventKind::ShopExit => "shop_exit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "order_opened" => Some(HistoryEventKind::OrderOpened),
            "order_closed" => Some(HistoryEventKind::OrderClosed),
            "parts_delivered" => Some(HistoryEventKind::PartsDelivered),
            "backup_assigned" => Some(HistoryEventKind::BackupAssigned),
            "backup_returned" => Some(HistoryEventKind::BackupReturned),
            "shop_exit" => Some(HistoryEventKind::ShopExit),
            _ => None,
        }
    }
}

/// Evento del historial - mapea a la tabla vehicle_history_events
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleHistoryEvent {
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

/// Datos para registrar un evento nuevo; todos los campos opcionales
/// salvo vehículo y tipo
#[derive(Debug, Clone, Default)]
pub struct NewHistoryEvent {
    pub work_order_id: Option<Uuid>,
    pub backup_id: Option<Uuid>,
    pub actor: Option<String>,
    pub status_before: Option<String>,
    pub status_after: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub details: Option<serde_json::Value>,
}
