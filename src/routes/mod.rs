//! Routers de la API
//!
//! Un router por recurso, montados bajo /api en main.

pub mod backup_routes;
pub mod history_routes;
pub mod part_request_routes;
pub mod stock_routes;
pub mod work_order_routes;
