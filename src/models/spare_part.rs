//! Modelos de repuestos y stock
//!
//! Catálogo de repuestos, existencias y movimientos. El StockLedger es el
//! único escritor de stock_items.quantity; los movimientos son insert-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Repuesto de catálogo - mapea a la tabla spare_parts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SparePart {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub unit_price: Decimal,
    pub reorder_threshold: i32,
    pub created_at: DateTime<Utc>,
}

/// Existencias de un repuesto - mapea a la tabla stock_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockItem {
    pub id: Uuid,
    pub spare_part_id: Uuid,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Chequeo de factibilidad contra la cantidad comprometida
    pub fn can_consume(&self, quantity: i32) -> bool {
        quantity > 0 && self.quantity >= quantity
    }

    pub fn is_at_or_below(&self, threshold: i32) -> bool {
        self.quantity <= threshold
    }
}

/// Dirección de un movimiento de stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementDirection {
    Inbound,
    Outbound,
    Adjustment,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::Inbound => "inbound",
            MovementDirection::Outbound => "outbound",
            MovementDirection::Adjustment => "adjustment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inbound" => Some(MovementDirection::Inbound),
            "outbound" => Some(MovementDirection::Outbound),
            "adjustment" => Some(MovementDirection::Adjustment),
            _ => None,
        }
    }
}

/// Movimiento de stock - registro inmutable con snapshot antes/después
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_item_id: Uuid,
    pub direction: String,
    pub delta: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reason: String,
    pub actor: String,
    pub work_order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            spare_part_id: Uuid::new_v4(),
            quantity,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_consume_requires_enough_stock() {
        assert!(item(2).can_consume(2));
        assert!(!item(2).can_consume(3));
        assert!(!item(2).can_consume(0));
        assert!(!item(0).can_consume(1));
    }

    #[test]
    fn test_second_consume_sees_committed_quantity() {
        // current=2: un consumo de 2 agota el stock, el segundo debe fallar
        let mut stock = item(2);
        assert!(stock.can_consume(2));
        stock.quantity -= 2;
        assert!(!stock.can_consume(2));
    }

    #[test]
    fn test_threshold_check() {
        assert!(item(3).is_at_or_below(3));
        assert!(!item(4).is_at_or_below(3));
    }
}
