use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::part_request_controller::PartRequestController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::part_request_dto::{
    CreatePartRequestRequest, DeliverPartRequestRequest, PartRequestResponse,
    RejectPartRequestRequest,
};
use crate::models::auth::ActorInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_part_request_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_part_request))
        .route("/:id", get(get_part_request))
        .route("/:id/approve", post(approve_part_request))
        .route("/:id/reject", post(reject_part_request))
        .route("/:id/deliver", post(deliver_part_request))
        .route("/work-order/:order_id", get(list_for_work_order))
}

async fn create_part_request(
    State(state): State<AppState>,
    actor: ActorInfo,
    Json(request): Json<CreatePartRequestRequest>,
) -> Result<Json<ApiResponse<PartRequestResponse>>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.create(request, &actor).await?;
    Ok(Json(response))
}

async fn get_part_request(
    State(state): State<AppState>,
    _actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<PartRequestResponse>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn approve_part_request(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<PartRequestResponse>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.approve(id, &actor).await?;
    Ok(Json(response))
}

async fn reject_part_request(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectPartRequestRequest>,
) -> Result<Json<PartRequestResponse>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.reject(id, request, &actor).await?;
    Ok(Json(response))
}

async fn deliver_part_request(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
    Json(request): Json<DeliverPartRequestRequest>,
) -> Result<Json<PartRequestResponse>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.deliver(id, request, &actor).await?;
    Ok(Json(response))
}

async fn list_for_work_order(
    State(state): State<AppState>,
    _actor: ActorInfo,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<PartRequestResponse>>, AppError> {
    let controller = PartRequestController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.list_for_order(order_id).await?;
    Ok(Json(response))
}
