//! Tests de la superficie HTTP sin base de datos: mapeo de errores a
//! status codes y extracción del actor desde los headers del gateway.

use axum::{body::Body, routing::get, Router};
use http::{Request, StatusCode};
use tower::ServiceExt;

use fleet_workshop::models::auth::{ActorInfo, ActorRole};
use fleet_workshop::utils::errors::AppError;

async fn failing(err: AppError) -> Result<&'static str, AppError> {
    Err(err)
}

fn error_router() -> Router {
    Router::new()
        .route(
            "/invalid-transition",
            get(|| {
                failing(AppError::InvalidTransition {
                    from: "open".to_string(),
                    to: "closed".to_string(),
                })
            }),
        )
        .route(
            "/insufficient-stock",
            get(|| {
                failing(AppError::InsufficientStock {
                    requested: 5,
                    available: 2,
                })
            }),
        )
        .route(
            "/forbidden",
            get(|| failing(AppError::AuthorizationDenied("no".to_string()))),
        )
        .route(
            "/not-found",
            get(|| failing(AppError::NotFound("work order".to_string()))),
        )
        .route("/no-active-pause", get(|| failing(AppError::NoActivePause)))
        .route(
            "/invariant",
            get(|| failing(AppError::InvariantViolation("negative".to_string()))),
        )
}

async fn status_of(router: Router, path: &str) -> StatusCode {
    let response = router
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn test_error_status_mapping() {
    assert_eq!(
        status_of(error_router(), "/invalid-transition").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_of(error_router(), "/insufficient-stock").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_of(error_router(), "/forbidden").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_of(error_router(), "/not-found").await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(error_router(), "/no-active-pause").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_of(error_router(), "/invariant").await,
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_error_body_carries_stable_code() {
    let response = error_router()
        .oneshot(
            Request::builder()
                .uri("/insufficient-stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["details"]["requested"], 5);
    assert_eq!(body["details"]["available"], 2);
}

fn actor_router() -> Router {
    Router::new().route(
        "/whoami",
        get(|actor: ActorInfo| async move {
            assert_eq!(actor.role, ActorRole::ShopChief);
            actor.id
        }),
    )
}

#[tokio::test]
async fn test_actor_extractor_accepts_gateway_headers() {
    let response = actor_router()
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-actor-id", "chief_01")
                .header("x-actor-role", "shop_chief")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_actor_extractor_rejects_missing_headers() {
    let response = actor_router()
        .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_actor_extractor_rejects_unknown_role() {
    let response = actor_router()
        .oneshot(
            Request::builder()
                .uri("/whoami")
                .header("x-actor-id", "someone")
                .header("x-actor-role", "janitor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
