//! Account routes: registration, login, and per-account message listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{list_or_empty, reject};
use crate::models::{Account, Message, NewAccount};
use crate::state::AppState;

/// `POST /register`: create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<NewAccount>,
) -> Result<Json<Account>, StatusCode> {
    state
        .accounts
        .register(body)
        .await
        .map(Json)
        .map_err(|e| reject(&e, StatusCode::BAD_REQUEST))
}

/// `POST /login`: verify credentials and return the account.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<NewAccount>,
) -> Result<Json<Account>, StatusCode> {
    state
        .accounts
        .login(&body)
        .await
        .map(Json)
        .map_err(|e| reject(&e, StatusCode::UNAUTHORIZED))
}

/// `GET /accounts/:account_id/messages`: every message the account posted.
pub async fn list_messages(State(state): State<AppState>, Path(account_id): Path<i32>) -> Json<Vec<Message>> {
    list_or_empty(state.accounts.messages_by_account(account_id).await)
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
