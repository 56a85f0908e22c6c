//! Advertisement CRUD routes.

use axum::{routing::get, Router};

use crate::handlers::advertisement::{create, delete as delete_handler, read, search, update};
use crate::state::AppState;

pub fn advertisement_routes(state: AppState) -> Router {
    Router::new()
        .route("/advertisement", get(search).post(create))
        .route(
            "/advertisement/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
