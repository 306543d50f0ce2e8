//! Values API: a fixed sample dataset read from the product catalog.

use axum::{Json, extract::Path, http::StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::catalog;

const VALUES_LIMIT: usize = 100;

#[derive(Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

pub async fn healthcheck() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn list_values() -> Json<Vec<String>> {
    debug!(rows = catalog::count(), "serving catalog values");
    Json(catalog::top_names(VALUES_LIMIT))
}

pub async fn get_value(Path(_id): Path<u32>) -> Json<String> {
    Json("value".to_string())
}

pub async fn create_value(_body: String) -> StatusCode {
    StatusCode::CREATED
}

pub async fn update_value(Path(_id): Path<u32>, _body: String) -> StatusCode {
    StatusCode::OK
}

pub async fn delete_value(Path(_id): Path<u32>) -> StatusCode {
    StatusCode::OK
}
