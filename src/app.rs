use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{api, items};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(items::index))
        .route("/item/create", get(items::create_form).post(items::create))
        .route("/item/edit", get(items::missing_id).post(items::edit))
        .route("/item/edit/{id}", get(items::edit_form))
        .route("/item/delete", get(items::missing_id).post(items::delete))
        .route("/item/delete/{id}", get(items::delete_confirm))
        .route("/item/details/{id}", get(items::details))
        .route("/healthz", get(api::healthcheck))
        .route(
            "/api/values",
            get(api::list_values).post(api::create_value),
        )
        .route(
            "/api/values/{id}",
            get(api::get_value)
                .put(api::update_value)
                .delete(api::delete_value),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
