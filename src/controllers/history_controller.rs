use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::history_dto::HistoryEventResponse;
use crate::models::auth::ActorInfo;
use crate::services::authorization_service::{AuthorizationService, EngineAction};
use crate::services::vehicle_history_service::VehicleHistoryService;
use crate::utils::errors::AppResult;

pub struct HistoryController {
    service: VehicleHistoryService,
    authz: AuthorizationService,
}

impl HistoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: VehicleHistoryService::new(pool),
            authz: AuthorizationService::new(),
        }
    }

    pub async fn get_timeline(
        &self,
        vehicle_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<Vec<HistoryEventResponse>> {
        self.authz.ensure_allowed(actor, EngineAction::ViewTimeline)?;

        let events = self.service.get_timeline(vehicle_id).await?;
        Ok(events.into_iter().map(HistoryEventResponse::from).collect())
    }
}
