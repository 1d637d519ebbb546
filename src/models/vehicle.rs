//! Modelo de Vehicle
//!
//! Registro mínimo de flota que el motor referencia. El estado operativo
//! se snapshotea en los eventos de historial y cambia con los backups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado operativo del vehículo - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Operational,
    InShop,
    BackupInUse,
    OutOfService,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Operational => "operational",
            VehicleStatus::InShop => "in_shop",
            VehicleStatus::BackupInUse => "backup_in_use",
            VehicleStatus::OutOfService => "out_of_service",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "operational" => Some(VehicleStatus::Operational),
            "in_shop" => Some(VehicleStatus::InShop),
            "backup_in_use" => Some(VehicleStatus::BackupInUse),
            "out_of_service" => Some(VehicleStatus::OutOfService),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_status: String,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::from_str(&self.vehicle_status).unwrap_or(VehicleStatus::OutOfService)
    }
}
