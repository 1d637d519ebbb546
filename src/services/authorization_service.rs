//! Servicio de autorización del motor
//!
//! Punto único de evaluación de permisos: cada operación del motor
//! consulta is_allowed una vez en su frontera antes de validar nada más.

use crate::models::auth::{ActorInfo, ActorRole};
use crate::utils::errors::{AppError, AppResult};

/// Acciones que el motor sabe autorizar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineAction {
    OpenWorkOrder,
    TransitionWorkOrder,
    PauseWorkOrder,
    ResumeWorkOrder,
    RequestParts,
    ApprovePartRequest,
    RejectPartRequest,
    DeliverParts,
    AdjustStock,
    ReceiveStock,
    ConsumeStock,
    ManageBackups,
    ViewTimeline,
}

impl EngineAction {
    pub fn describe(&self) -> &'static str {
        match self {
            EngineAction::OpenWorkOrder => "open work orders",
            EngineAction::TransitionWorkOrder => "transition work orders",
            EngineAction::PauseWorkOrder => "pause work orders",
            EngineAction::ResumeWorkOrder => "resume work orders",
            EngineAction::RequestParts => "request spare parts",
            EngineAction::ApprovePartRequest => "approve part requests",
            EngineAction::RejectPartRequest => "reject part requests",
            EngineAction::DeliverParts => "deliver spare parts",
            EngineAction::AdjustStock => "adjust stock",
            EngineAction::ReceiveStock => "receive stock",
            EngineAction::ConsumeStock => "consume stock",
            EngineAction::ManageBackups => "manage backup assignments",
            EngineAction::ViewTimeline => "view vehicle timelines",
        }
    }
}

pub struct AuthorizationService;

impl AuthorizationService {
    pub fn new() -> Self {
        Self
    }

    /// Matriz de permisos rol -> acción
    pub fn is_allowed(&self, actor: &ActorInfo, action: EngineAction) -> bool {
        use ActorRole::*;

        if actor.role == Admin {
            return true;
        }

        match action {
            EngineAction::OpenWorkOrder => matches!(actor.role, Guard | ShopChief),
            EngineAction::TransitionWorkOrder => {
                matches!(actor.role, Mechanic | ShopChief | Supervisor)
            }
            EngineAction::PauseWorkOrder | EngineAction::ResumeWorkOrder => {
                matches!(actor.role, Mechanic | ShopChief)
            }
            EngineAction::RequestParts => matches!(actor.role, Mechanic | ShopChief),
            EngineAction::ApprovePartRequest | EngineAction::RejectPartRequest => {
                matches!(actor.role, ShopChief | Warehouse)
            }
            EngineAction::DeliverParts => matches!(actor.role, Warehouse),
            EngineAction::AdjustStock | EngineAction::ReceiveStock => {
                matches!(actor.role, Warehouse)
            }
            EngineAction::ConsumeStock => matches!(actor.role, Warehouse | ShopChief),
            EngineAction::ManageBackups => matches!(actor.role, Supervisor | ShopChief),
            EngineAction::ViewTimeline => true,
        }
    }

    /// Versión que corta con AuthorizationDenied; se evalúa antes de
    /// cualquier otra validación de la operación
    pub fn ensure_allowed(&self, actor: &ActorInfo, action: EngineAction) -> AppResult<()> {
        if self.is_allowed(actor, action) {
            Ok(())
        } else {
            Err(AppError::AuthorizationDenied(format!(
                "Role '{}' cannot {}",
                actor.role.as_str(),
                action.describe()
            )))
        }
    }
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: ActorRole) -> ActorInfo {
        ActorInfo::new("actor_01", role)
    }

    #[test]
    fn test_open_work_order_matrix() {
        let authz = AuthorizationService::new();

        assert!(authz.is_allowed(&actor(ActorRole::Guard), EngineAction::OpenWorkOrder));
        assert!(authz.is_allowed(&actor(ActorRole::ShopChief), EngineAction::OpenWorkOrder));
        assert!(authz.is_allowed(&actor(ActorRole::Admin), EngineAction::OpenWorkOrder));
        assert!(!authz.is_allowed(&actor(ActorRole::Mechanic), EngineAction::OpenWorkOrder));
        assert!(!authz.is_allowed(&actor(ActorRole::Warehouse), EngineAction::OpenWorkOrder));
    }

    #[test]
    fn test_stock_is_warehouse_territory() {
        let authz = AuthorizationService::new();

        assert!(authz.is_allowed(&actor(ActorRole::Warehouse), EngineAction::AdjustStock));
        assert!(authz.is_allowed(&actor(ActorRole::Warehouse), EngineAction::DeliverParts));
        assert!(!authz.is_allowed(&actor(ActorRole::Mechanic), EngineAction::AdjustStock));
        assert!(!authz.is_allowed(&actor(ActorRole::ShopChief), EngineAction::DeliverParts));
    }

    #[test]
    fn test_admin_can_do_everything() {
        let authz = AuthorizationService::new();
        let admin = actor(ActorRole::Admin);

        for action in [
            EngineAction::OpenWorkOrder,
            EngineAction::TransitionWorkOrder,
            EngineAction::DeliverParts,
            EngineAction::AdjustStock,
            EngineAction::ManageBackups,
        ] {
            assert!(authz.is_allowed(&admin, action));
        }
    }

    #[test]
    fn test_everyone_reads_timelines() {
        let authz = AuthorizationService::new();
        for role in [
            ActorRole::Guard,
            ActorRole::ShopChief,
            ActorRole::Mechanic,
            ActorRole::Warehouse,
            ActorRole::Supervisor,
            ActorRole::Admin,
        ] {
            assert!(authz.is_allowed(&actor(role), EngineAction::ViewTimeline));
        }
    }

    #[test]
    fn test_ensure_allowed_returns_typed_error() {
        let authz = AuthorizationService::new();
        let err = authz
            .ensure_allowed(&actor(ActorRole::Mechanic), EngineAction::AdjustStock)
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationDenied(_)));
    }
}
