//! Repositorios de acceso a datos
//!
//! Un repositorio por agregado. Las operaciones sensibles a concurrencia
//! exponen variantes que trabajan dentro de una transacción con
//! SELECT ... FOR UPDATE sobre la fila a mutar.

pub mod audit_repository;
pub mod backup_repository;
pub mod part_request_repository;
pub mod pause_repository;
pub mod stock_repository;
pub mod vehicle_history_repository;
pub mod vehicle_repository;
pub mod work_order_repository;
