//! Actores del sistema
//!
//! El gateway resuelve la identidad y el rol; el motor solo recibe
//! el actor ya verificado en cada operación.

use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRole {
    Guard,
    ShopChief,
    Mechanic,
    Warehouse,
    Supervisor,
    Admin,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Guard => "guard",
            ActorRole::ShopChief => "shop_chief",
            ActorRole::Mechanic => "mechanic",
            ActorRole::Warehouse => "warehouse",
            ActorRole::Supervisor => "supervisor",
            ActorRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "guard" => Some(ActorRole::Guard),
            "shop_chief" => Some(ActorRole::ShopChief),
            "mechanic" => Some(ActorRole::Mechanic),
            "warehouse" => Some(ActorRole::Warehouse),
            "supervisor" => Some(ActorRole::Supervisor),
            "admin" => Some(ActorRole::Admin),
            _ => None,
        }
    }
}

/// Información del actor autenticado que ejecuta una operación
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorInfo {
    pub id: String,
    pub role: ActorRole,
}

impl ActorInfo {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self { id: id.into(), role }
    }
}
