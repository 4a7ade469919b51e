use axum::{
    Router,
    routing::{get, post},
};

use crate::assets;
use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::serve_index))
        .route("/healthz", get(handler::healthcheck))
        .route("/api/items", get(handler::get_items))
        .route("/api/add", post(handler::add_item))
        .route("/api/edit/:item_id", post(handler::edit_item))
        .route("/api/delete/:item_id", post(handler::delete_item))
        .fallback(assets::serve_embedded)
}
