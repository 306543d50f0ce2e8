// ============================================================================
// tododoc Library
// ============================================================================

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod views;

// Re-export main types for convenience
pub use app::build_router;
pub use error::{AppError, AppResult};
pub use models::Item;
pub use repository::DocumentRepository;
pub use store::{
    DocumentStore, HttpDocumentStore, MemoryDocumentStore, StoreError, StoreResult,
};
pub use telemetry::{RecordingSink, Telemetry, TelemetrySink};
