use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::stock_dto::{
    AdjustStockRequest, ConsumeStockRequest, ReceiveStockRequest, StockItemResponse,
    StockMovementResponse,
};
use crate::models::auth::ActorInfo;
use crate::services::notification_service::Notifier;
use crate::services::stock_ledger_service::StockLedgerService;
use crate::utils::errors::AppResult;

const RECENT_MOVEMENTS: i64 = 20;

pub struct StockController {
    service: StockLedgerService,
}

impl StockController {
    pub fn new(pool: PgPool, notifier: Notifier) -> Self {
        Self {
            service: StockLedgerService::new(pool, notifier),
        }
    }

    pub async fn adjust(
        &self,
        part_id: Uuid,
        request: AdjustStockRequest,
        actor: &ActorInfo,
    ) -> AppResult<StockMovementResponse> {
        request.validate()?;
        let movement = self
            .service
            .adjust(part_id, request.new_quantity, &request.reason, actor)
            .await?;
        Ok(movement.into())
    }

    pub async fn receive(
        &self,
        part_id: Uuid,
        request: ReceiveStockRequest,
        actor: &ActorInfo,
    ) -> AppResult<StockMovementResponse> {
        request.validate()?;
        let movement = self
            .service
            .receive(part_id, request.quantity, &request.reason, actor)
            .await?;
        Ok(movement.into())
    }

    pub async fn consume(
        &self,
        part_id: Uuid,
        request: ConsumeStockRequest,
        actor: &ActorInfo,
    ) -> AppResult<StockMovementResponse> {
        request.validate()?;
        let movement = self
            .service
            .reserve_and_consume(
                part_id,
                request.quantity,
                &request.reason,
                actor,
                request.work_order_id,
            )
            .await?;
        Ok(movement.into())
    }

    pub async fn get(&self, part_id: Uuid) -> AppResult<StockItemResponse> {
        let part = self.service.get_part(part_id).await?;
        let item = self.service.get_item(part_id).await?;
        let movements = self.service.recent_movements(item.id, RECENT_MOVEMENTS).await?;
        Ok(StockItemResponse::new(part, item, movements))
    }
}
