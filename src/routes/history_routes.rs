use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::history_controller::HistoryController;
use crate::dto::history_dto::HistoryEventResponse;
use crate::models::auth::ActorInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_history_router() -> Router<AppState> {
    Router::new().route("/vehicle/:vehicle_id", get(get_vehicle_timeline))
}

async fn get_vehicle_timeline(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEventResponse>>, AppError> {
    let controller = HistoryController::new(state.pool.clone());
    let response = controller.get_timeline(vehicle_id, &actor).await?;
    Ok(Json(response))
}
