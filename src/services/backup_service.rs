//! Asignaciones de vehículo de backup
//!
//! Sustitución temporal mientras el titular está en taller. Un vehículo
//! no puede sustituirse a sí mismo ni estar de sustituto en dos
//! asignaciones activas.

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::ActorInfo;
use crate::models::backup::BackupAssignment;
use crate::models::vehicle::VehicleStatus;
use crate::models::vehicle_history::{HistoryEventKind, NewHistoryEvent};
use crate::repositories::backup_repository::BackupRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::audit_service::AuditService;
use crate::services::authorization_service::{AuthorizationService, EngineAction};
use crate::services::vehicle_history_service::VehicleHistoryService;
use crate::utils::errors::{AppError, AppResult};

pub struct BackupService {
    pool: PgPool,
    backups: BackupRepository,
    vehicles: VehicleRepository,
    audit: AuditService,
    history: VehicleHistoryService,
    authz: AuthorizationService,
}

impl BackupService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            backups: BackupRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            audit: AuditService::new(pool.clone()),
            history: VehicleHistoryService::new(pool.clone()),
            authz: AuthorizationService::new(),
            pool,
        }
    }

    pub async fn assign(
        &self,
        principal_vehicle_id: Uuid,
        substitute_vehicle_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<BackupAssignment> {
        self.authz.ensure_allowed(actor, EngineAction::ManageBackups)?;

        if principal_vehicle_id == substitute_vehicle_id {
            return Err(AppError::InvariantViolation(
                "A vehicle cannot substitute for itself".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        self.vehicles
            .find_by_id_for_update(&mut tx, principal_vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicle with id '{}' not found",
                    principal_vehicle_id
                ))
            })?;
        let substitute = self
            .vehicles
            .find_by_id_for_update(&mut tx, substitute_vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicle with id '{}' not found",
                    substitute_vehicle_id
                ))
            })?;

        if self
            .backups
            .find_active_by_substitute(&mut tx, substitute_vehicle_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Vehicle is already the substitute of an active assignment".to_string(),
            ));
        }
        if substitute.status() != VehicleStatus::Operational {
            return Err(AppError::Conflict(format!(
                "Substitute vehicle is '{}', expected 'operational'",
                substitute.vehicle_status
            )));
        }

        let assignment = self
            .backups
            .insert(&mut tx, principal_vehicle_id, substitute_vehicle_id, &actor.id, now)
            .await?;
        self.vehicles
            .update_status(
                &mut tx,
                substitute_vehicle_id,
                VehicleStatus::BackupInUse.as_str(),
            )
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "backup.assign",
                "backup_assignment",
                assignment.id,
                json!({
                    "principal": principal_vehicle_id,
                    "substitute": substitute_vehicle_id,
                }),
            )
            .await;

        tx.commit().await?;

        self.history
            .record_event(
                principal_vehicle_id,
                HistoryEventKind::BackupAssigned,
                NewHistoryEvent {
                    backup_id: Some(assignment.id),
                    actor: Some(actor.id.clone()),
                    status_before: Some(substitute.vehicle_status.clone()),
                    status_after: Some(VehicleStatus::BackupInUse.as_str().to_string()),
                    started_at: Some(now),
                    details: Some(json!({ "substitute_vehicle_id": substitute_vehicle_id })),
                    ..Default::default()
                },
            )
            .await;

        Ok(assignment)
    }

    /// Devuelve el sustituto a servicio y cierra la asignación
    pub async fn close(
        &self,
        assignment_id: Uuid,
        actor: &ActorInfo,
    ) -> AppResult<BackupAssignment> {
        self.authz.ensure_allowed(actor, EngineAction::ManageBackups)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let assignment = self
            .backups
            .find_by_id_for_update(&mut tx, assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Backup assignment with id '{}' not found",
                    assignment_id
                ))
            })?;

        if !assignment.is_active() {
            return Err(AppError::Conflict(
                "Backup assignment is already closed".to_string(),
            ));
        }

        let closed = self.backups.close(&mut tx, assignment_id, now).await?;
        self.vehicles
            .update_status(
                &mut tx,
                assignment.substitute_vehicle_id,
                VehicleStatus::Operational.as_str(),
            )
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "backup.return",
                "backup_assignment",
                assignment_id,
                json!({ "substitute": assignment.substitute_vehicle_id }),
            )
            .await;

        tx.commit().await?;

        self.history
            .record_event(
                assignment.principal_vehicle_id,
                HistoryEventKind::BackupReturned,
                NewHistoryEvent {
                    backup_id: Some(assignment.id),
                    actor: Some(actor.id.clone()),
                    started_at: Some(assignment.started_at),
                    ended_at: closed.ended_at,
                    details: Some(json!({
                        "substitute_vehicle_id": assignment.substitute_vehicle_id,
                    })),
                    ..Default::default()
                },
            )
            .await;

        Ok(closed)
    }

    pub async fn get(&self, assignment_id: Uuid) -> AppResult<BackupAssignment> {
        self.backups.find_by_id(assignment_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "Backup assignment with id '{}' not found",
                assignment_id
            ))
        })
    }
}
