use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::spare_part::{SparePart, StockItem, StockMovement};
use crate::utils::errors::AppError;

pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_part(&self, part_id: Uuid) -> Result<Option<SparePart>, AppError> {
        let part = sqlx::query_as::<_, SparePart>("SELECT * FROM spare_parts WHERE id = $1")
            .bind(part_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(part)
    }

    pub async fn find_item_by_part(&self, part_id: Uuid) -> Result<Option<StockItem>, AppError> {
        let item =
            sqlx::query_as::<_, StockItem>("SELECT * FROM stock_items WHERE spare_part_id = $1")
                .bind(part_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(item)
    }

    /// Bloquea la fila de stock; todo chequeo de cantidad posterior ve el
    /// valor comprometido, no una lectura obsoleta
    pub async fn find_item_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        part_id: Uuid,
    ) -> Result<Option<StockItem>, AppError> {
        let item = sqlx::query_as::<_, StockItem>(
            "SELECT * FROM stock_items WHERE spare_part_id = $1 FOR UPDATE",
        )
        .bind(part_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(item)
    }

    pub async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        new_quantity: i32,
    ) -> Result<StockItem, AppError> {
        let item = sqlx::query_as::<_, StockItem>(
            r#"
            UPDATE stock_items
            SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(new_quantity)
        .fetch_one(&mut **tx)
        .await?;

        Ok(item)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_movement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        stock_item_id: Uuid,
        direction: &str,
        delta: i32,
        quantity_before: i32,
        quantity_after: i32,
        reason: &str,
        actor: &str,
        work_order_id: Option<Uuid>,
    ) -> Result<StockMovement, AppError> {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (id, stock_item_id, direction, delta, quantity_before,
                 quantity_after, reason, actor, work_order_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(stock_item_id)
        .bind(direction)
        .bind(delta)
        .bind(quantity_before)
        .bind(quantity_after)
        .bind(reason)
        .bind(actor)
        .bind(work_order_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(movement)
    }

    pub async fn list_movements(
        &self,
        stock_item_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT * FROM stock_movements
            WHERE stock_item_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(stock_item_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}
