use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::part_request_dto::{
    CreatePartRequestRequest, DeliverPartRequestRequest, PartRequestResponse,
    RejectPartRequestRequest,
};
use crate::models::auth::ActorInfo;
use crate::services::notification_service::Notifier;
use crate::services::reservation_service::ReservationService;
use crate::utils::errors::AppResult;

pub struct PartRequestController {
    service: ReservationService,
}

impl PartRequestController {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            service: ReservationService::new(pool, notifier),
        }
    }

    pub async fn create(
        &self,
        request: CreatePartRequestRequest,
        actor: &ActorInfo,
    ) -> AppResult<ApiResponse<PartRequestResponse>> {
        request.validate()?;

        let created = self
            .service
            .create(
                request.work_order_id,
                request.spare_part_id,
                request.quantity,
                actor,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            created.into(),
            "Solicitud de repuestos creada exitosamente".to_string(),
        ))
    }

    pub async fn approve(
        &self,
        request_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<PartRequestResponse> {
        let updated = self.service.approve(request_id, actor).await?;
        Ok(updated.into())
    }

    pub async fn reject(
        &self,
        request_id: Uuid,
        request: RejectPartRequestRequest,
        actor: &ActorInfo,
    ) -> AppResult<PartRequestResponse> {
        request.validate()?;
        let updated = self.service.reject(request_id, &request.reason, actor).await?;
        Ok(updated.into())
    }

    pub async fn deliver(
        &self,
        request_id: Uuid,
        request: DeliverPartRequestRequest,
        actor: &ActorInfo,
    ) -> AppResult<PartRequestResponse> {
        request.validate()?;
        let updated = self
            .service
            .deliver(request_id, request.delivered_quantity, actor)
            .await?;
        Ok(updated.into())
    }

    pub async fn get(&self, request_id: Uuid) -> AppResult<PartRequestResponse> {
        let request = self.service.get(request_id).await?;
        Ok(request.into())
    }

    pub async fn list_for_order(
        &self,
        work_order_id: Uuid,
    ) -> AppResult<Vec<PartRequestResponse>> {
        let requests = self.service.list_for_order(work_order_id).await?;
        Ok(requests.into_iter().map(PartRequestResponse::from).collect())
    }
}
