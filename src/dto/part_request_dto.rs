use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::part_request::PartRequest;

// Request para solicitar repuestos
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartRequestRequest {
    pub work_order_id: Uuid,
    pub spare_part_id: Uuid,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

// Request para rechazar una solicitud
#[derive(Debug, Deserialize, Validate)]
pub struct RejectPartRequestRequest {
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

// Request para entregar repuestos
#[derive(Debug, Deserialize, Validate)]
pub struct DeliverPartRequestRequest {
    #[validate(range(min = 1))]
    pub delivered_quantity: i32,
}

// Response de solicitud de repuestos
#[derive(Debug, Serialize)]
pub struct PartRequestResponse {
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

impl From<PartRequest> for PartRequestResponse {
    fn from(request: PartRequest) -> Self {
        Self {
            id: request.id,
            work_order_id: request.work_order_id,
            line_item: request.line_item,
            spare_part_id: request.spare_part_id,
            requested_quantity: request.requested_quantity,
            delivered_quantity: request.delivered_quantity,
            state: request.state,
            requested_by: request.requested_by,
            approved_by: request.approved_by,
            delivered_by: request.delivered_by,
            rejection_reason: request.rejection_reason,
            requested_at: request.requested_at,
            approved_at: request.approved_at,
            resolved_at: request.resolved_at,
        }
    }
}
