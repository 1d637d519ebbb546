use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::spare_part::{SparePart, StockItem, StockMovement};

// Request para fijar la cantidad exacta de un repuesto
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockRequest {
    #[validate(range(min = 0))]
    pub new_quantity: i32,

    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

// Request de entrada de mercadería
#[derive(Debug, Deserialize, Validate)]
pub struct ReceiveStockRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

// Request de consumo directo
#[derive(Debug, Deserialize, Validate)]
pub struct ConsumeStockRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,

    #[validate(length(min = 3, max = 500))]
    pub reason: String,

    pub work_order_id: Option<Uuid>,
}

// Response de movimiento de stock
#[derive(Debug, Serialize)]
pub struct StockMovementResponse {
    pub id: Uuid,
    pub direction: String,
    pub delta: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reason: String,
    pub actor: String,
    pub work_order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<StockMovement> for StockMovementResponse {
    fn from(movement: StockMovement) -> Self {
        Self {
            id: movement.id,
            direction: movement.direction,
            delta: movement.delta,
            quantity_before: movement.quantity_before,
            quantity_after: movement.quantity_after,
            reason: movement.reason,
            actor: movement.actor,
            work_order_id: movement.work_order_id,
            created_at: movement.created_at,
        }
    }
}

// Response de existencias de un repuesto
#[derive(Debug, Serialize)]
pub struct StockItemResponse {
    pub spare_part_id: Uuid,
    pub reference: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub reorder_threshold: i32,
    pub below_threshold: bool,
    pub recent_movements: Vec<StockMovementResponse>,
}

impl StockItemResponse {
    pub fn new(part: SparePart, item: StockItem, movements: Vec<StockMovement>) -> Self {
        let below_threshold = item.is_at_or_below(part.reorder_threshold);
        Self {
            spare_part_id: part.id,
            reference: part.reference,
            name: part.name,
            unit_price: part.unit_price,
            quantity: item.quantity,
            reorder_threshold: part.reorder_threshold,
            below_threshold,
            recent_movements: movements
                .into_iter()
                .map(StockMovementResponse::from)
                .collect(),
        }
    }
}
