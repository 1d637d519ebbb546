use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::backup_controller::BackupController;
use crate::dto::backup_dto::{BackupResponse, CreateBackupRequest};
use crate::dto::common_dto::ApiResponse;
use crate::models::auth::ActorInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_backup_router() -> Router<AppState> {
    Router::new()
        .route("/", post(assign_backup))
        .route("/:id", get(get_backup))
        .route("/:id/return", post(return_backup))
}

async fn assign_backup(
    State(state): State<AppState>,
    actor: ActorInfo,
    Json(request): Json<CreateBackupRequest>,
) -> Result<Json<ApiResponse<BackupResponse>>, AppError> {
    let controller = BackupController::new(state.pool.clone());
    let response = controller.assign(request, &actor).await?;
    Ok(Json(response))
}

async fn get_backup(
    State(state): State<AppState>,
    _actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<BackupResponse>, AppError> {
    let controller = BackupController::new(state.pool.clone());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn return_backup(
    State(state): State<AppState>,
    actor: ActorInfo,
    Path(id): Path<Uuid>,
) -> Result<Json<BackupResponse>, AppError> {
    let controller = BackupController::new(state.pool.clone());
    let response = controller.close(id, &actor).await?;
    Ok(Json(response))
}
