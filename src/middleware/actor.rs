//! Extracción del actor
//!
//! El gateway autentica y resuelve el rol; acá solo se leen los headers
//! X-Actor-Id y X-Actor-Role ya verificados. Un rol desconocido o
//! ausente corta antes de llegar a cualquier handler.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::models::auth::{ActorInfo, ActorRole};
use crate::utils::errors::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

#[async_trait]
impl<S> FromRequestParts<S> for ActorInfo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor_id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::AuthorizationDenied("Missing X-Actor-Id header".to_string())
            })?;

        let role_raw = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthorizationDenied("Missing X-Actor-Role header".to_string())
            })?;

        let role = ActorRole::from_str(role_raw).ok_or_else(|| {
            AppError::AuthorizationDenied(format!("Unknown actor role '{}'", role_raw))
        })?;

        Ok(ActorInfo::new(actor_id, role))
    }
}
