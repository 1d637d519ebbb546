use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::backup_dto::{BackupResponse, CreateBackupRequest};
use crate::dto::common_dto::ApiResponse;
use crate::models::auth::ActorInfo;
use crate::services::backup_service::BackupService;
use crate::utils::errors::AppResult;

pub struct BackupController {
    service: BackupService,
}

impl BackupController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: BackupService::new(pool),
        }
    }

    pub async fn assign(
        &self,
        request: CreateBackupRequest,
        actor: &ActorInfo,
    ) -> AppResult<ApiResponse<BackupResponse>> {
        let assignment = self
            .service
            .assign(
                request.principal_vehicle_id,
                request.substitute_vehicle_id,
                actor,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            assignment.into(),
            "Vehículo de backup asignado exitosamente".to_string(),
        ))
    }

    pub async fn close(
        &self,
        assignment_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<BackupResponse> {
        let assignment = self.service.close(assignment_id, actor).await?;
        Ok(assignment.into())
    }

    pub async fn get(&self, assignment_id: Uuid) -> AppResult<BackupResponse> {
        let assignment = self.service.get(assignment_id).await?;
        Ok(assignment.into())
    }
}
