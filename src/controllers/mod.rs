//! Controllers de la API
//!
//! Capa fina entre DTOs y servicios del motor: valida forma, parsea
//! enums y delega.

pub mod backup_controller;
pub mod history_controller;
pub mod part_request_controller;
pub mod stock_controller;
pub mod work_order_controller;
