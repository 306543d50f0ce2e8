use std::sync::Arc;

use crate::models::Item;
use crate::repository::DocumentRepository;
use crate::telemetry::Telemetry;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<DocumentRepository<Item>>,
    pub telemetry: Telemetry,
    pub http: reqwest::Client,
    pub api_url: Option<String>,
}

impl AppState {
    pub fn new(
        repo: Arc<DocumentRepository<Item>>,
        telemetry: Telemetry,
        api_url: Option<String>,
    ) -> Self {
        Self {
            repo,
            telemetry,
            http: reqwest::Client::new(),
            api_url,
        }
    }
}
