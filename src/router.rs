use crate::handlers::{
    health::health_check,
    payments::{
        create_payment, delete_payment, get_payment, get_payment_info, get_payment_statistics, get_payments,
        get_period_summary, update_payment,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Reports over payments
        .route("/api/v1/payments/summary", get(get_period_summary))
        .route("/api/v1/payments/statistics", get(get_payment_statistics))
        .route("/api/v1/payments/info", get(get_payment_info))
        // Payment CRUD routes
        .route("/api/v1/payments", post(create_payment).get(get_payments))
        .route(
            "/api/v1/payments/:payment_reference",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
