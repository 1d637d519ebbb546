//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor: la máquina de
//! estados de órdenes, la contabilidad de tiempos, la política SLA, el
//! libro de stock y el flujo de reservas de repuestos.

pub mod audit_service;
pub mod authorization_service;
pub mod backup_service;
pub mod notification_service;
pub mod reservation_service;
pub mod sla_service;
pub mod state_machine_service;
pub mod stock_ledger_service;
pub mod time_accounting;
pub mod vehicle_history_service;
