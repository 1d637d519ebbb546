use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::part_request::PartRequest;
use crate::utils::errors::AppError;

pub struct PartRequestRepository {
    pool: PgPool,
}

impl PartRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        work_order_id: Uuid,
        line_item: i32,
        spare_part_id: Uuid,
        requested_quantity: i32,
        requested_by: &str,
    ) -> Result<PartRequest, AppError> {
        let request = sqlx::query_as::<_, PartRequest>(
            r#"
            INSERT INTO part_requests
                (id, work_order_id, line_item, spare_part_id,
                 requested_quantity, delivered_quantity, state,
                 requested_by, requested_at)
            VALUES ($1, $2, $3, $4, $5, 0, 'pending', $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(work_order_id)
        .bind(line_item)
        .bind(spare_part_id)
        .bind(requested_quantity)
        .bind(requested_by)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    /// Siguiente ordinal de línea dentro de la orden
    pub async fn next_line_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        work_order_id: Uuid,
    ) -> Result<i32, AppError> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(line_item), 0) + 1 FROM part_requests WHERE work_order_id = $1",
        )
        .bind(work_order_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PartRequest>, AppError> {
        let request = sqlx::query_as::<_, PartRequest>("SELECT * FROM part_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    /// Bloquea la solicitud; dos aprobaciones concurrentes se serializan
    /// y la segunda observa el estado ya comprometido
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<PartRequest>, AppError> {
        let request =
            sqlx::query_as::<_, PartRequest>("SELECT * FROM part_requests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(request)
    }

    pub async fn mark_approved(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        approved_by: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<PartRequest, AppError> {
        let request = sqlx::query_as::<_, PartRequest>(
            r#"
            UPDATE part_requests
            SET state = 'approved', approved_by = $2, approved_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved_by)
        .bind(approved_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn mark_rejected(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        rejected_by: &str,
        reason: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<PartRequest, AppError> {
        let request = sqlx::query_as::<_, PartRequest>(
            r#"
            UPDATE part_requests
            SET state = 'rejected', approved_by = $2, rejection_reason = $3, resolved_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rejected_by)
        .bind(reason)
        .bind(resolved_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn mark_delivered(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        delivered_by: &str,
        delivered_quantity: i32,
        resolved_at: DateTime<Utc>,
    ) -> Result<PartRequest, AppError> {
        let request = sqlx::query_as::<_, PartRequest>(
            r#"
            UPDATE part_requests
            SET state = 'delivered', delivered_by = $2,
                delivered_quantity = $3, resolved_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delivered_by)
        .bind(delivered_quantity)
        .bind(resolved_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(request)
    }

    pub async fn list_for_order(&self, work_order_id: Uuid) -> Result<Vec<PartRequest>, AppError> {
        let requests = sqlx::query_as::<_, PartRequest>(
            "SELECT * FROM part_requests WHERE work_order_id = $1 ORDER BY line_item ASC",
        )
        .bind(work_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
