use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{admin_handlers, handlers, provider::FinancialsProvider};

/// Create the main application router with all view-model and admin
/// passthrough endpoints.
pub fn create_router(provider: Arc<dyn FinancialsProvider>) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Financial view models
        .route("/api/:ticker/metrics", get(handlers::get_metrics))
        .route("/api/:ticker/chart", get(handlers::get_chart))
        .route(
            "/api/:ticker/statements/:statement",
            get(handlers::get_statement_table),
        )
        // Concept normalization admin
        .route(
            "/admin/api/concept-normalization-overrides",
            get(admin_handlers::list_concept_overrides)
                .post(admin_handlers::create_concept_override),
        )
        .route(
            "/admin/api/concept-normalization-overrides/export",
            get(admin_handlers::export_concept_overrides),
        )
        .route(
            "/admin/api/concept-normalization-overrides/import",
            post(admin_handlers::import_concept_overrides),
        )
        .route(
            "/admin/api/concept-normalization-overrides/:statement/:concept",
            get(admin_handlers::get_concept_override)
                .put(admin_handlers::update_concept_override)
                .delete(admin_handlers::delete_concept_override),
        )
        // Dimension normalization admin
        .route(
            "/admin/api/dimension-normalization-overrides",
            get(admin_handlers::list_dimension_overrides)
                .post(admin_handlers::create_dimension_override),
        )
        .route(
            "/admin/api/dimension-normalization-overrides/export",
            get(admin_handlers::export_dimension_overrides),
        )
        .route(
            "/admin/api/dimension-normalization-overrides/import",
            post(admin_handlers::import_dimension_overrides),
        )
        .route(
            "/admin/api/dimension-normalization-overrides/:axis/:member/:member_label",
            get(admin_handlers::get_dimension_override)
                .put(admin_handlers::update_dimension_override)
                .delete(admin_handlers::delete_dimension_override),
        )
        // Ingestion trigger
        .route(
            "/admin/api/financials/refresh",
            post(admin_handlers::refresh_financials),
        )
        // Add shared state
        .with_state(provider)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
