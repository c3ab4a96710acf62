use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::d405_sales_report::{self, AppState};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // D405 Sales Report
        .route("/api/filters", get(d405_sales_report::get_filters))
        .route("/api/dashboard", post(d405_sales_report::post_dashboard))
        .route("/api/table", post(d405_sales_report::post_table))
        .route("/api/export", post(d405_sales_report::post_export))
        .with_state(state)
}
