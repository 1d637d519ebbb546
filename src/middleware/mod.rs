//! Middleware del sistema
//!
//! Este módulo contiene el middleware de CORS y la extracción del actor
//! ya resuelto por el gateway.

pub mod actor;
pub mod cors;

pub use actor::*;
pub use cors::*;
