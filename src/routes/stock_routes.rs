use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::stock_controller::StockController;
use crate::dto::stock_dto::{
    AdjustStockRequest, ConsumeStockRequest, ReceiveStockRequest, StockItemResponse,
    StockMovementResponse,
};
use crate::models::auth::ActorInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stock_router() -> Router<AppState> {
    Router::new()
        .route("/:part_id", get(get_stock))
        .route("/:part_id/adjust", post(adjust_stock))
        .route("/:part_id/receive", post(receive_stock))
        .route("/:part_id/consume", post(consume_stock))
}

async fn get_stock(
    State(state): State<AppState>,
    _actor: ActorInfo,
    Path(part_id): Path<Uuid>,
) -> Result<Json<StockItemResponse>, AppError> {
    let controller = StockController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.get(part_id).await?;
    Ok(Json(response))
}

async fn adjust_stock(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(part_id): Path<Uuid>,
    Json(request): Json<AdjustStockRequest>,
) -> Result<Json<StockMovementResponse>, AppError> {
    let controller = StockController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.adjust(part_id, request, &actor).await?;
    Ok(Json(response))
}

async fn receive_stock(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(part_id): Path<Uuid>,
    Json(request): Json<ReceiveStockRequest>,
) -> Result<Json<StockMovementResponse>, AppError> {
    let controller = StockController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.receive(part_id, request, &actor).await?;
    Ok(Json(response))
}

async fn consume_stock(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(part_id): Path<Uuid>,
    Json(request): Json<ConsumeStockRequest>,
) -> Result<Json<StockMovementResponse>, AppError> {
    let controller = StockController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.consume(part_id, request, &actor).await?;
    Ok(Json(response))
}
