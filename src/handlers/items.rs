//! MVC item pages: list, create, edit, delete, details.

use std::time::Instant;

use axum::{
    extract::{Form, Path, RawForm, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{DeleteForm, Item, ItemForm};
use crate::state::AppState;
use crate::telemetry::{Severity, Telemetry};
use crate::{catalog, views};

const VALUES_LIMIT: usize = 100;

/// Lists every incomplete item, after a dependency-tracked fetch of the
/// values dataset.
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let values = fetch_values(&state).await?;
    let items = state.repo.get_items(|item: &Item| !item.completed).await?;
    Ok(views::index_page(&items, &values))
}

/// One dependency-call event per index render: remote when `API_URL` is
/// configured, a local catalog read otherwise. Fetch failures propagate
/// after the event is recorded.
async fn fetch_values(state: &AppState) -> AppResult<Vec<String>> {
    let started_at = Utc::now();
    let started = Instant::now();

    let (command, result) = match &state.api_url {
        Some(base) => {
            let url = format!("{}/api/values", base.trim_end_matches('/'));
            let outcome = request_values(&state.http, &url).await;
            (url, outcome)
        }
        None => ("catalog".to_string(), Ok(catalog::top_names(VALUES_LIMIT))),
    };

    state.telemetry.track_dependency(
        "Index.Values",
        &command,
        started_at,
        started.elapsed(),
        result.is_ok(),
    );
    result
}

async fn request_values(client: &reqwest::Client, url: &str) -> AppResult<Vec<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| AppError::Upstream(err.to_string()))?;
    response
        .json()
        .await
        .map_err(|err| AppError::Upstream(err.to_string()))
}

pub async fn create_form() -> Html<String> {
    views::create_page(None)
}

pub async fn create(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AppResult<Response> {
    trace_post(&state.telemetry, "create", &body);

    let form: ItemForm = serde_urlencoded::from_bytes(&body)
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    if form.name.trim().is_empty() {
        return Ok(views::create_page(Some("Name is required")).into_response());
    }

    state.repo.create_item(&form.into_item()).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let item = state
        .repo
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::not_found("item not found"))?;
    Ok(views::edit_page(&item, None))
}

pub async fn edit(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> AppResult<Response> {
    if form.name.trim().is_empty() {
        let item = form.clone().into_item();
        return Ok(views::edit_page(&item, Some("Name is required")).into_response());
    }

    let item = form.into_item();
    let id = item.id.clone();
    state.repo.update_item(&id, &item).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let item = state
        .repo
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::not_found("item not found"))?;
    Ok(views::delete_page(&item))
}

pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> AppResult<Redirect> {
    state.repo.delete_item(&form.id).await?;
    Ok(Redirect::to("/"))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let item = state
        .repo
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::not_found("item not found"))?;
    Ok(views::details_page(&item))
}

/// The edit and delete pages require an id path segment.
pub async fn missing_id() -> AppError {
    AppError::bad_request("item id is required")
}

fn trace_post(telemetry: &Telemetry, method: &str, body: &[u8]) {
    let raw = String::from_utf8_lossy(body);
    telemetry.track_trace(
        &raw,
        Severity::Warning,
        &[("PostData", "true"), ("Method", method)],
    );
}
