use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::work_order::WorkOrder;
use crate::utils::errors::AppError;

pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        category: &str,
        priority: &str,
        state: &str,
        description: Option<String>,
        assigned_mechanic: Option<Uuid>,
        responsible: &str,
        sla_deadline: Option<DateTime<Utc>>,
        opened_at: DateTime<Utc>,
    ) -> Result<WorkOrder, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>(
            r#"
            INSERT INTO work_orders
                (id, vehicle_id, category, priority, state, description,
                 opened_at, assigned_mechanic, responsible, sla_deadline,
                 sla_breached, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(category)
        .bind(priority)
        .bind(state)
        .bind(description)
        .bind(opened_at)
        .bind(assigned_mechanic)
        .bind(responsible)
        .bind(sla_deadline)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkOrder>, AppError> {
        let order = sqlx::query_as::<_, WorkOrder>("SELECT * FROM work_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Bloquea la fila de la orden durante la transacción en curso
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<WorkOrder>, AppError> {
        let order =
            sqlx::query_as::<_, WorkOrder>("SELECT * FROM work_orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(order)
    }

    /// Persiste los campos que una transición puede haber tocado
    pub async fn persist_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &WorkOrder,
    ) -> Result<WorkOrder, AppError> {
        let updated = sqlx::query_as::<_, WorkOrder>(
            r#"
            UPDATE work_orders
            SET state = $2,
                diagnosed_at = $3,
                execution_started_at = $4,
                closed_at = $5,
                waiting_days = $6,
                execution_days = $7,
                total_repair_days = $8,
                sla_breached = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(&order.state)
        .bind(order.diagnosed_at)
        .bind(order.execution_started_at)
        .bind(order.closed_at)
        .bind(order.waiting_days)
        .bind(order.execution_days)
        .bind(order.total_repair_days)
        .bind(order.sla_breached)
        .fetch_one(&mut **tx)
        .await?;

        Ok(updated)
    }

    pub async fn set_sla_breached(&self, id: Uuid, breached: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE work_orders SET sla_breached = $2 WHERE id = $1")
            .bind(id)
            .bind(breached)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Órdenes vivas con deadline vencido que aún no están marcadas
    pub async fn find_overdue_unflagged(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<WorkOrder>, AppError> {
        let orders = sqlx::query_as::<_, WorkOrder>(
            r#"
            SELECT * FROM work_orders
            WHERE sla_deadline IS NOT NULL
              AND sla_deadline < $1
              AND sla_breached = FALSE
              AND state NOT IN ('closed', 'void')
            ORDER BY sla_deadline ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
