//! Modelo de PartRequest
//!
//! Solicitud de repuestos contra una orden de trabajo. Las transiciones
//! son monótonas: pending -> approved -> delivered, pending -> rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Estado de una solicitud de repuestos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartRequestState {
    Pending,
    Approved,
    Rejected,
    Delivered,
}

impl PartRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartRequestState::Pending => "pending",
            PartRequestState::Approved => "approved",
            PartRequestState::Rejected => "rejected",
            PartRequestState::Delivered => "delivered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PartRequestState::Pending),
            "approved" => Some(PartRequestState::Approved),
            "rejected" => Some(PartRequestState::Rejected),
            "delivered" => Some(PartRequestState::Delivered),
            _ => None,
        }
    }

    /// rejected y delivered son terminales; approved solo admite delivered
    pub fn is_terminal(&self) -> bool {
        matches!(self, PartRequestState::Rejected | PartRequestState::Delivered)
    }
}

/// Solicitud de repuestos - mapea a la tabla part_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartRequest {
    pub id: Uuid,
    pub work_order_id: Uuid,
    pub line_item: i32,
    pub spare_part_id: Uuid,
    pub requested_quantity: i32,
    pub delivered_quantity: i32,
    pub state: String,
    pub requested_by: String,
    pub approved_by: Option<String>,
    pub delivered_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PartRequest {
    pub fn current_state(&self) -> PartRequestState {
        PartRequestState::from_str(&self.state).unwrap_or(PartRequestState::Rejected)
    }

    /// Solo una solicitud pendiente puede aprobarse o rechazarse
    pub fn ensure_pending(&self) -> AppResult<()> {
        if self.current_state() != PartRequestState::Pending {
            return Err(AppError::Conflict(format!(
                "Part request {} is '{}', expected 'pending'",
                self.id, self.state
            )));
        }
        Ok(())
    }

    /// La entrega exige estado approved y cantidad válida (0 < qty <= solicitada)
    pub fn validate_delivery(&self, delivered_quantity: i32) -> AppResult<()> {
        if self.current_state() != PartRequestState::Approved {
            return Err(AppError::Conflict(format!(
                "Part request {} is '{}', expected 'approved'",
                self.id, self.state
            )));
        }
        if delivered_quantity <= 0 {
            return Err(AppError::InvariantViolation(
                "delivered_quantity must be greater than zero".to_string(),
            ));
        }
        if delivered_quantity > self.requested_quantity {
            return Err(AppError::InvariantViolation(format!(
                "delivered_quantity {} exceeds requested_quantity {}",
                delivered_quantity, self.requested_quantity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(state: &str, requested: i32) -> PartRequest {
        PartRequest {
            id: Uuid::new_v4(),
            work_order_id: Uuid::new_v4(),
            line_item: 1,
            spare_part_id: Uuid::new_v4(),
            requested_quantity: requested,
            delivered_quantity: 0,
            state: state.to_string(),
            requested_by: "mech_01".to_string(),
            approved_by: None,
            delivered_by: None,
            rejection_reason: None,
            requested_at: Utc::now(),
            approved_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn test_approve_requires_pending() {
        assert!(request("pending", 2).ensure_pending().is_ok());
        assert!(request("approved", 2).ensure_pending().is_err());
        assert!(request("rejected", 2).ensure_pending().is_err());
        assert!(request("delivered", 2).ensure_pending().is_err());
    }

    #[test]
    fn test_delivery_quantity_bounds() {
        let req = request("approved", 4);
        assert!(req.validate_delivery(4).is_ok());
        assert!(req.validate_delivery(2).is_ok());
        assert!(req.validate_delivery(5).is_err());
        assert!(req.validate_delivery(0).is_err());
    }

    #[test]
    fn test_delivery_requires_approved() {
        assert!(request("pending", 2).validate_delivery(1).is_err());
        assert!(request("delivered", 2).validate_delivery(1).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(PartRequestState::Rejected.is_terminal());
        assert!(PartRequestState::Delivered.is_terminal());
        assert!(!PartRequestState::Pending.is_terminal());
        assert!(!PartRequestState::Approved.is_terminal());
    }
}
