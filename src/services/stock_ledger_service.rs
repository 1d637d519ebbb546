//! Libro de stock
//!
//! Único mutador de stock_items.quantity. Cada operación bloquea la fila
//! de stock, re-chequea la cantidad contra el valor comprometido y escribe
//! cantidad y movimiento en la misma transacción: la cantidad almacenada
//! nunca baja de cero.

use chrono::Utc;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::auth::ActorInfo;
use crate::models::spare_part::{MovementDirection, SparePart, StockItem, StockMovement};
use crate::repositories::stock_repository::StockRepository;
use crate::services::audit_service::AuditService;
use crate::services::authorization_service::{AuthorizationService, EngineAction};
use crate::services::notification_service::{NotificationEvent, Notifier};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{require_non_negative_quantity, require_positive_quantity, require_reason};

pub struct StockLedgerService {
    pool: PgPool,
    stock: StockRepository,
    audit: AuditService,
    authz: AuthorizationService,
    notifier: Notifier,
}

impl StockLedgerService {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            stock: StockRepository::new(pool.clone()),
            audit: AuditService::new(pool.clone()),
            authz: AuthorizationService::new(),
            notifier,
            pool,
        }
    }

    /// Fija la cantidad exacta pedida; el delta se calcula contra el
    /// valor bloqueado, no contra una lectura previa
    pub async fn adjust(
        &self,
        part_id: Uuid,
        new_quantity: i32,
        reason: &str,
        actor: &ActorInfo,
    ) -> AppResult<StockMovement> {
        self.authz.ensure_allowed(actor, EngineAction::AdjustStock)?;
        require_non_negative_quantity(new_quantity, "new_quantity")?;
        require_reason(reason)?;

        let part = self.require_part(part_id).await?;

        let mut tx = self.pool.begin().await?;
        let item = self.require_item_locked(&mut tx, part_id).await?;

        let delta = new_quantity - item.quantity;
        let updated = self.stock.update_quantity(&mut tx, item.id, new_quantity).await?;
        let movement = self
            .stock
            .insert_movement(
                &mut tx,
                item.id,
                MovementDirection::Adjustment.as_str(),
                delta,
                item.quantity,
                updated.quantity,
                reason,
                &actor.id,
                None,
            )
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "stock.adjust",
                "stock_item",
                item.id,
                json!({ "before": item.quantity, "after": new_quantity, "reason": reason }),
            )
            .await;
        tx.commit().await?;

        self.maybe_warn_low_stock(&part, &updated);
        Ok(movement)
    }

    /// Entrada de mercadería; siempre positiva
    pub async fn receive(
        &self,
        part_id: Uuid,
        quantity: i32,
        reason: &str,
        actor: &ActorInfo,
    ) -> AppResult<StockMovement> {
        self.authz.ensure_allowed(actor, EngineAction::ReceiveStock)?;
        require_positive_quantity(quantity, "quantity")?;
        require_reason(reason)?;

        self.require_part(part_id).await?;

        let mut tx = self.pool.begin().await?;
        let item = self.require_item_locked(&mut tx, part_id).await?;

        let new_quantity = item.quantity + quantity;
        let updated = self.stock.update_quantity(&mut tx, item.id, new_quantity).await?;
        let movement = self
            .stock
            .insert_movement(
                &mut tx,
                item.id,
                MovementDirection::Inbound.as_str(),
                quantity,
                item.quantity,
                updated.quantity,
                reason,
                &actor.id,
                None,
            )
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "stock.receive",
                "stock_item",
                item.id,
                json!({ "quantity": quantity, "after": new_quantity, "reason": reason }),
            )
            .await;
        tx.commit().await?;

        Ok(movement)
    }

    /// Consumo directo de stock (fuera del flujo de reservas)
    pub async fn reserve_and_consume(
        &self,
        part_id: Uuid,
        quantity: i32,
        reason: &str,
        actor: &ActorInfo,
        work_order_id: Option<Uuid>,
    ) -> AppResult<StockMovement> {
        self.authz.ensure_allowed(actor, EngineAction::ConsumeStock)?;

        let part = self.require_part(part_id).await?;

        let mut tx = self.pool.begin().await?;
        let (updated, movement) = self
            .consume_in_tx(&mut tx, part_id, quantity, reason, actor, work_order_id)
            .await?;
        tx.commit().await?;

        self.maybe_warn_low_stock(&part, &updated);
        Ok(movement)
    }

    /// Núcleo del consumo, componible dentro de la transacción de otra
    /// operación (la entrega de una solicitud de repuestos).
    ///
    /// El chequeo de cantidad corre sobre la fila bloqueada: dos consumos
    /// concurrentes se serializan y el segundo ve la cantidad ya
    /// descontada.
    pub async fn consume_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        part_id: Uuid,
        quantity: i32,
        reason: &str,
        actor: &ActorInfo,
        work_order_id: Option<Uuid>,
    ) -> AppResult<(StockItem, StockMovement)> {
        require_positive_quantity(quantity, "quantity")?;
        require_reason(reason)?;

        let item = self.require_item_locked(tx, part_id).await?;

        if item.quantity < quantity {
            return Err(AppError::InsufficientStock {
                requested: quantity,
                available: item.quantity,
            });
        }

        let new_quantity = item.quantity - quantity;
        let updated = self.stock.update_quantity(tx, item.id, new_quantity).await?;
        let movement = self
            .stock
            .insert_movement(
                tx,
                item.id,
                MovementDirection::Outbound.as_str(),
                -quantity,
                item.quantity,
                updated.quantity,
                reason,
                &actor.id,
                work_order_id,
            )
            .await?;

        self.audit
            .record_tx(
                tx,
                actor,
                "stock.consume",
                "stock_item",
                item.id,
                json!({
                    "quantity": quantity,
                    "after": new_quantity,
                    "work_order_id": work_order_id,
                }),
            )
            .await;

        Ok((updated, movement))
    }

    pub async fn get_part(&self, part_id: Uuid) -> AppResult<SparePart> {
        self.require_part(part_id).await
    }

    pub async fn get_item(&self, part_id: Uuid) -> AppResult<StockItem> {
        self.stock
            .find_item_by_part(part_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Stock item for part '{}' not found", part_id))
            })
    }

    pub async fn recent_movements(
        &self,
        stock_item_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<StockMovement>> {
        self.stock.list_movements(stock_item_id, limit).await
    }

    /// Aviso best-effort al cruzar el umbral de reposición
    pub fn maybe_warn_low_stock(&self, part: &SparePart, item: &StockItem) {
        if item.is_at_or_below(part.reorder_threshold) {
            self.notifier.dispatch(NotificationEvent::new(
                "stock.low",
                "spare_part",
                part.id,
                json!({
                    "reference": part.reference,
                    "quantity": item.quantity,
                    "reorder_threshold": part.reorder_threshold,
                    "at": Utc::now(),
                }),
            ));
        }
    }

    async fn require_part(&self, part_id: Uuid) -> AppResult<SparePart> {
        self.stock.find_part(part_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Spare part with id '{}' not found", part_id))
        })
    }

    async fn require_item_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        part_id: Uuid,
    ) -> AppResult<StockItem> {
        self.stock
            .find_item_for_update(tx, part_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Stock item for part '{}' not found", part_id))
            })
    }
}
