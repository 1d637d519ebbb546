use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::work_order_dto::{
    CreatePauseRequest, CreateWorkOrderRequest, PauseResponse, TransitionRequest,
    WorkOrderDetailResponse, WorkOrderResponse,
};
use crate::models::auth::ActorInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_work_order))
        .route("/:id", get(get_work_order))
        .route("/:id/transition", post(transition_work_order))
        .route("/:id/pause", post(pause_work_order))
        .route("/:id/resume", post(resume_work_order))
}

async fn create_work_order(
    State(state): State<AppState>,
    actor: ActorInfo,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderResponse>>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.create(request, &actor).await?;
    Ok(Json(response))
}

async fn get_work_order(
    State(state): State<AppState>,
    _actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkOrderDetailResponse>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn transition_work_order(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<WorkOrderResponse>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.transition(id, request, &actor).await?;
    Ok(Json(response))
}

async fn pause_work_order(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePauseRequest>,
) -> Result<Json<PauseResponse>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.pause(id, request, &actor).await?;
    Ok(Json(response))
}

async fn resume_work_order(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkOrderResponse>, AppError> {
    let controller = WorkOrderController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.resume(id, &actor).await?;
    Ok(Json(response))
}
