use super::*;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::db::StoreError;

/// Drive one request through a router and collect the response.
pub(crate) async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

/// Parse a response body as JSON.
pub(crate) fn json(bytes: &Bytes) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("response body should be JSON")
}

#[tokio::test]
async fn healthz_is_ok() {
    let (state, _stores) = crate::state::test_helpers::test_app_state();
    let (status, body) = send(app(state), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (state, _stores) = crate::state::test_helpers::test_app_state();
    let (status, _) = send(app(state), Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn reject_passes_status_through() {
    let err = ServiceError::Unavailable(StoreError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(reject(&err, StatusCode::BAD_REQUEST), StatusCode::BAD_REQUEST);
    assert_eq!(reject(&ServiceError::NotFound, StatusCode::UNAUTHORIZED), StatusCode::UNAUTHORIZED);
}

#[test]
fn list_or_empty_degrades_failure_to_empty_list() {
    let Json(items) = list_or_empty::<i32>(Err(ServiceError::NotFound));
    assert!(items.is_empty());
    let Json(items) = list_or_empty(Ok(vec![1, 2]));
    assert_eq!(items, vec![1, 2]);
}
