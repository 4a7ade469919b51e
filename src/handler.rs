//! HTTP handlers for the wishlist API

use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::error::WishlistError;
use crate::model::ItemForm;
use crate::store::ItemStore;
use crate::unpack_error;
use crate::wishlist::Wishlist;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OpResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn success(id: Option<String>) -> Response {
    (StatusCode::OK, Json(OpResponse { success: true, id })).into_response()
}

fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: msg.to_string(),
        }),
    )
        .into_response()
}

fn unprocessable(msg: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            detail: msg.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: msg.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_items(State(state): State<AppState>) -> Response {
    let wishlist = Wishlist::new(state.store.as_ref());

    match wishlist.list().await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list items: {}", unpack_error(&e));
            internal_error("Failed to list items")
        }
    }
}

pub async fn add_item(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Response {
    let wishlist = Wishlist::new(state.store.as_ref());

    match wishlist.create(form).await {
        Ok(id) => success(Some(id)),
        Err(WishlistError::Validation(msg)) => unprocessable(&msg),
        Err(e) => {
            tracing::error!("Failed to add item: {}", unpack_error(&e));
            internal_error("Failed to add item")
        }
    }
}

pub async fn edit_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Response {
    let wishlist = Wishlist::new(state.store.as_ref());

    match wishlist.update(&item_id, form).await {
        Ok(()) => success(None),
        Err(WishlistError::NotFound(_)) => not_found("Item not found"),
        Err(WishlistError::Validation(msg)) => unprocessable(&msg),
        Err(e) => {
            tracing::error!("Failed to update item {}: {}", item_id, unpack_error(&e));
            internal_error("Failed to update item")
        }
    }
}

pub async fn delete_item(State(state): State<AppState>, Path(item_id): Path<String>) -> Response {
    let wishlist = Wishlist::new(state.store.as_ref());

    match wishlist.delete(&item_id).await {
        Ok(()) => success(None),
        Err(WishlistError::NotFound(_)) => not_found("Item not found"),
        Err(e) => {
            tracing::error!("Failed to delete item {}: {}", item_id, unpack_error(&e));
            internal_error("Failed to delete item")
        }
    }
}
