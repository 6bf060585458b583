use super::{controllers, models};
use axum::routing::{delete, get, post, put, Router};

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/", get(controllers::root))
        .route("/notes", get(controllers::list_notes))
        .route("/notes", post(controllers::create_note))
        .route("/notes/:id", get(controllers::get_note))
        .route("/notes/:id", put(controllers::update_note))
        .route("/notes/:id", delete(controllers::delete_note))
}
