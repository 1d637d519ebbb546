use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::work_order_dto::{
    CreatePauseRequest, CreateWorkOrderRequest, PauseResponse, TransitionRequest,
    WorkOrderDetailResponse, WorkOrderResponse,
};
use crate::models::auth::ActorInfo;
use crate::models::pause::PauseReason;
use crate::models::work_order::{WorkOrderCategory, WorkOrderPriority, WorkOrderState};
use crate::services::notification_service::Notifier;
use crate::services::state_machine_service::{NewWorkOrder, StateMachineService};
use crate::services::time_accounting;
use crate::utils::errors::{AppError, AppResult};

pub struct WorkOrderController {
    service: StateMachineService,
}

impl WorkOrderController {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            service: StateMachineService::new(pool, notifier),
        }
    }

    pub async fn create(
        &self,
        request: CreateWorkOrderRequest,
        actor: &ActorInfo,
    ) -> AppResult<ApiResponse<WorkOrderResponse>> {
        request.validate()?;

        let category = WorkOrderCategory::from_str(&request.category).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown work order category '{}'", request.category))
        })?;
        let priority = match &request.priority {
            Some(p) => WorkOrderPriority::from_str(p).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown work order priority '{}'", p))
            })?,
            None => WorkOrderPriority::Normal,
        };

        let order = self
            .service
            .create_work_order(
                NewWorkOrder {
                    vehicle_id: request.vehicle_id,
                    category,
                    priority,
                    description: request.description,
                    assigned_mechanic: request.assigned_mechanic,
                },
                actor,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            order.into(),
            "Orden de trabajo creada exitosamente".to_string(),
        ))
    }

    pub async fn transition(
        &self,
        order_id: Uuid,
        request: TransitionRequest,
        actor: &ActorInfo,
    ) -> AppResult<WorkOrderResponse> {
        let target = WorkOrderState::from_str(&request.target_state).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown work order state '{}'", request.target_state))
        })?;

        let order = self.service.do_transition(order_id, target, actor).await?;
        Ok(order.into())
    }

    pub async fn pause(
        &self,
        order_id: Uuid,
        request: CreatePauseRequest,
        actor: &ActorInfo,
    ) -> AppResult<PauseResponse> {
        let reason = PauseReason::from_str(&request.reason).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown pause reason '{}'", request.reason))
        })?;

        let pause = self.service.create_pause(order_id, reason, actor).await?;
        Ok(pause.into())
    }

    pub async fn resume(&self, order_id: Uuid, actor: &ActorInfo) -> AppResult<WorkOrderResponse> {
        let order = self.service.resume_from_pause(order_id, actor).await?;
        Ok(order.into())
    }

    pub async fn get_detail(&self, order_id: Uuid) -> AppResult<WorkOrderDetailResponse> {
        let order = self.service.get_order(order_id).await?;
        let pauses = self.service.get_order_pauses(order_id).await?;
        let live = time_accounting::compute_durations(&order, &pauses, Utc::now());
        Ok(WorkOrderDetailResponse::new(order, pauses, live))
    }
}
