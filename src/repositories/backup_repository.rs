use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::backup::BackupAssignment;
use crate::utils::errors::AppError;

pub struct BackupRepository {
    pool: PgPool,
}

impl BackupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        principal_vehicle_id: Uuid,
        substitute_vehicle_id: Uuid,
        created_by: &str,
        started_at: DateTime<Utc>,
    ) -> Result<BackupAssignment, AppError> {
        let assignment = sqlx::query_as::<_, BackupAssignment>(
            r#"
            INSERT INTO backup_assignments
                (id, principal_vehicle_id, substitute_vehicle_id, started_at, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(principal_vehicle_id)
        .bind(substitute_vehicle_id)
        .bind(started_at)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BackupAssignment>, AppError> {
        let assignment =
            sqlx::query_as::<_, BackupAssignment>("SELECT * FROM backup_assignments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(assignment)
    }

    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<BackupAssignment>, AppError> {
        let assignment = sqlx::query_as::<_, BackupAssignment>(
            "SELECT * FROM backup_assignments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(assignment)
    }

    /// Asignación activa donde el vehículo actúa como sustituto
    pub async fn find_active_by_substitute(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        substitute_vehicle_id: Uuid,
    ) -> Result<Option<BackupAssignment>, AppError> {
        let assignment = sqlx::query_as::<_, BackupAssignment>(
            r#"
            SELECT * FROM backup_assignments
            WHERE substitute_vehicle_id = $1 AND ended_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(substitute_vehicle_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(assignment)
    }

    pub async fn close(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<BackupAssignment, AppError> {
        let assignment = sqlx::query_as::<_, BackupAssignment>(
            r#"
            UPDATE backup_assignments
            SET ended_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ended_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }
}
