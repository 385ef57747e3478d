//! Message routes: post, list, fetch, edit, and delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;

use super::{json_or_empty, list_or_empty, reject};
use crate::models::{Message, NewMessage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateMessageBody {
    pub message_text: String,
}

/// `POST /messages`: post a new message.
pub async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<NewMessage>,
) -> Result<Json<Message>, StatusCode> {
    state
        .messages
        .create(body)
        .await
        .map(Json)
        .map_err(|e| reject(&e, StatusCode::BAD_REQUEST))
}

/// `GET /messages`: all messages.
pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    list_or_empty(state.messages.list_all().await)
}

/// `GET /messages/:message_id`: one message, or an empty 200.
pub async fn get_message(State(state): State<AppState>, Path(message_id): Path<i32>) -> Response {
    json_or_empty(state.messages.get_by_id(message_id).await)
}

/// `PATCH /messages/:message_id`: replace the text, return the updated message.
pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i32>,
    Json(body): Json<UpdateMessageBody>,
) -> Result<Json<Message>, StatusCode> {
    state
        .messages
        .update_text(message_id, &body.message_text)
        .await
        .map(Json)
        .map_err(|e| reject(&e, StatusCode::BAD_REQUEST))
}

/// `DELETE /messages/:message_id`: delete, returning the removed message or an empty 200.
pub async fn delete_message(State(state): State<AppState>, Path(message_id): Path<i32>) -> Response {
    json_or_empty(state.messages.delete_by_id(message_id).await)
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
