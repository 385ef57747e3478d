//! Router assembly and the status-code contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! Handlers parse JSON bodies and path ids, call a service, and translate
//! the outcome. Every service error collapses to one failure status per
//! endpoint: 400 for register/post/patch, 401 for login. A missing message
//! on get or delete is a 200 with an empty body, and list endpoints answer
//! with an empty array when the store is down.

pub mod accounts;
pub mod messages;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::services::ServiceError;
use crate::state::AppState;

/// Build the full HTTP router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/accounts/{account_id}/messages", get(accounts::list_messages))
        .route("/messages", get(messages::list_messages).post(messages::create_message))
        .route(
            "/messages/{message_id}",
            get(messages::get_message)
                .patch(messages::update_message)
                .delete(messages::delete_message),
        )
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Answer a service failure with `status`. Store errors were already
/// logged at `error` by the store layer.
pub(crate) fn reject(err: &ServiceError, status: StatusCode) -> StatusCode {
    debug!(error = %err, %status, "request rejected");
    status
}

/// A record as JSON, or an empty 200 when there is none.
pub(crate) fn json_or_empty<T: Serialize>(result: Result<Option<T>, ServiceError>) -> Response {
    match result {
        Ok(Some(value)) => Json(value).into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => reject(&e, StatusCode::OK).into_response(),
    }
}

/// A list as JSON; store failures degrade to an empty list.
pub(crate) fn list_or_empty<T: Serialize>(result: Result<Vec<T>, ServiceError>) -> Json<Vec<T>> {
    match result {
        Ok(items) => Json(items),
        Err(e) => {
            reject(&e, StatusCode::OK);
            Json(Vec::new())
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
