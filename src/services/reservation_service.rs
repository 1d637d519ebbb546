//! Flujo de reservas de repuestos
//!
//! pending -> approved -> delivered, pending -> rejected; ninguna otra
//! arista. La aprobación es un chequeo de factibilidad, no una retención:
//! la entrega re-chequea el stock contra el valor comprometido.

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::ActorInfo;
use crate::models::part_request::PartRequest;
use crate::models::vehicle_history::{HistoryEventKind, NewHistoryEvent};
use crate::repositories::part_request_repository::PartRequestRepository;
use crate::repositories::stock_repository::StockRepository;
use crate::repositories::work_order_repository::WorkOrderRepository;
use crate::services::audit_service::AuditService;
use crate::services::authorization_service::{AuthorizationService, EngineAction};
use crate::services::notification_service::{NotificationEvent, Notifier};
use crate::services::stock_ledger_service::StockLedgerService;
use crate::services::vehicle_history_service::VehicleHistoryService;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{require_positive_quantity, require_reason};

pub struct ReservationService {
    pool: PgPool,
    requests: PartRequestRepository,
    orders: WorkOrderRepository,
    stock: StockRepository,
    ledger: StockLedgerService,
    audit: AuditService,
    history: VehicleHistoryService,
    authz: AuthorizationService,
    notifier: Notifier,
}

impl ReservationService {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            requests: PartRequestRepository::new(pool.clone()),
            orders: WorkOrderRepository::new(pool.clone()),
            stock: StockRepository::new(pool.clone()),
            ledger: StockLedgerService::new(pool.clone(), notifier.clone()),
            audit: AuditService::new(pool.clone()),
            history: VehicleHistoryService::new(pool.clone()),
            authz: AuthorizationService::new(),
            notifier,
            pool,
        }
    }

    /// Alta de solicitud contra una orden viva
    pub async fn create(
        &self,
        work_order_id: Uuid,
        spare_part_id: Uuid,
        quantity: i32,
        actor: &ActorInfo,
    ) -> AppResult<PartRequest> {
        self.authz.ensure_allowed(actor, EngineAction::RequestParts)?;
        require_positive_quantity(quantity, "quantity")?;

        let part = self.stock.find_part(spare_part_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Spare part with id '{}' not found", spare_part_id))
        })?;

        let mut tx = self.pool.begin().await?;

        // lock de la orden: serializa la numeración de líneas
        let order = self
            .orders
            .find_by_id_for_update(&mut tx, work_order_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Work order with id '{}' not found", work_order_id))
            })?;

        if !order.accepts_part_requests() {
            return Err(AppError::Conflict(format!(
                "Work order in state '{}' does not accept part requests",
                order.state
            )));
        }

        let line_item = self.requests.next_line_item(&mut tx, work_order_id).await?;
        let request = self
            .requests
            .insert(&mut tx, work_order_id, line_item, spare_part_id, quantity, &actor.id)
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "part_request.create",
                "part_request",
                request.id,
                json!({
                    "work_order_id": work_order_id,
                    "spare_part": part.reference,
                    "quantity": quantity,
                }),
            )
            .await;

        tx.commit().await?;
        Ok(request)
    }

    /// Aprueba una solicitud pendiente si el stock actual alcanza.
    /// No retiene stock; la entrega vuelve a chequear.
    pub async fn approve(&self, request_id: Uuid, actor: &ActorInfo) -> AppResult<PartRequest> {
        self.authz
            .ensure_allowed(actor, EngineAction::ApprovePartRequest)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = self.require_locked(&mut tx, request_id).await?;
        request.ensure_pending()?;

        let item = self
            .stock
            .find_item_by_part(request.spare_part_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Stock item for part '{}' not found",
                    request.spare_part_id
                ))
            })?;

        if item.quantity < request.requested_quantity {
            return Err(AppError::InsufficientStock {
                requested: request.requested_quantity,
                available: item.quantity,
            });
        }

        let updated = self
            .requests
            .mark_approved(&mut tx, request_id, &actor.id, now)
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "part_request.approve",
                "part_request",
                request_id,
                json!({ "requested_quantity": updated.requested_quantity }),
            )
            .await;

        tx.commit().await?;

        self.notifier.dispatch(NotificationEvent::new(
            "part_request.approved",
            "part_request",
            request_id,
            json!({ "work_order_id": updated.work_order_id }),
        ));

        Ok(updated)
    }

    /// Rechaza una solicitud pendiente con razón obligatoria
    pub async fn reject(
        &self,
        request_id: Uuid,
        reason: &str,
        actor: &ActorInfo,
    ) -> AppResult<PartRequest> {
        self.authz
            .ensure_allowed(actor, EngineAction::RejectPartRequest)?;
        require_reason(reason)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = self.require_locked(&mut tx, request_id).await?;
        request.ensure_pending()?;

        let updated = self
            .requests
            .mark_rejected(&mut tx, request_id, &actor.id, reason, now)
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "part_request.reject",
                "part_request",
                request_id,
                json!({ "reason": reason }),
            )
            .await;

        tx.commit().await?;
        Ok(updated)
    }

    /// Entrega una solicitud aprobada consumiendo stock en la misma
    /// transacción. El segundo chequeo de cantidad es obligatorio porque
    /// la aprobación no retuvo nada.
    pub async fn deliver(
        &self,
        request_id: Uuid,
        delivered_quantity: i32,
        actor: &ActorInfo,
    ) -> AppResult<PartRequest> {
        self.authz.ensure_allowed(actor, EngineAction::DeliverParts)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let request = self.require_locked(&mut tx, request_id).await?;
        request.validate_delivery(delivered_quantity)?;

        let (item_after, _movement) = self
            .ledger
            .consume_in_tx(
                &mut tx,
                request.spare_part_id,
                delivered_quantity,
                "part request delivery",
                actor,
                Some(request.work_order_id),
            )
            .await?;

        let updated = self
            .requests
            .mark_delivered(&mut tx, request_id, &actor.id, delivered_quantity, now)
            .await?;

        self.audit
            .record_tx(
                &mut tx,
                actor,
                "part_request.deliver",
                "part_request",
                request_id,
                json!({
                    "delivered_quantity": delivered_quantity,
                    "requested_quantity": updated.requested_quantity,
                }),
            )
            .await;

        tx.commit().await?;

        // Canales laterales tras el commit: timeline del vehículo,
        // aviso de stock bajo y notificación de entrega
        if let Ok(Some(order)) = self.orders.find_by_id(updated.work_order_id).await {
            self.history
                .record_event(
                    order.vehicle_id,
                    HistoryEventKind::PartsDelivered,
                    NewHistoryEvent {
                        work_order_id: Some(order.id),
                        actor: Some(actor.id.clone()),
                        details: Some(json!({
                            "part_request_id": updated.id,
                            "spare_part_id": updated.spare_part_id,
                            "delivered_quantity": delivered_quantity,
                        })),
                        ..Default::default()
                    },
                )
                .await;
        }
        if let Ok(part) = self.ledger.get_part(updated.spare_part_id).await {
            self.ledger.maybe_warn_low_stock(&part, &item_after);
        }
        self.notifier.dispatch(NotificationEvent::new(
            "part_request.delivered",
            "part_request",
            request_id,
            json!({
                "work_order_id": updated.work_order_id,
                "delivered_quantity": delivered_quantity,
            }),
        ));

        Ok(updated)
    }

    pub async fn get(&self, request_id: Uuid) -> AppResult<PartRequest> {
        self.requests.find_by_id(request_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Part request with id '{}' not found", request_id))
        })
    }

    pub async fn list_for_order(&self, work_order_id: Uuid) -> AppResult<Vec<PartRequest>> {
        self.requests.list_for_order(work_order_id).await
    }

    async fn require_locked(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        request_id: Uuid,
    ) -> AppResult<PartRequest> {
        self.requests
            .find_by_id_for_update(tx, request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Part request with id '{}' not found", request_id))
            })
    }
}
