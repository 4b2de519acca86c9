use common::{PaymentDetail, PaymentInfo, PaymentStatistics, PaymentStatus, PeriodSummary};
use compute::PaymentLedger;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

pub use common::ApiResponse;

use crate::handlers::payments::{CreatePaymentRequest, PaymentResponse, UpdatePaymentRequest};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Serialized writer for payments
    pub ledger: PaymentLedger,
    /// Cache for dashboard statistics, cleared on every payment change
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Statistics(PaymentStatistics),
}

/// Filters for listing payments and for dashboard statistics
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PaymentListQuery {
    /// Only payments of this tenant
    #[validate(range(min = 1))]
    pub tenant_id: Option<i32>,
    /// Only payments for this rental
    #[validate(range(min = 1))]
    pub rental_id: Option<i32>,
    /// Only payments of this billing period (YYYY-MM)
    #[validate(length(equal = 7))]
    pub period_label: Option<String>,
}

/// Identifies one billing period of a tenant in a rental
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PeriodSummaryQuery {
    #[validate(range(min = 1))]
    pub tenant_id: i32,
    #[validate(range(min = 1))]
    pub rental_id: i32,
    /// Billing period (YYYY-MM)
    #[validate(length(equal = 7))]
    pub period_label: String,
}

/// Parameters for pre-filling a new payment
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PaymentInfoQuery {
    #[validate(range(min = 1))]
    pub tenant_id: i32,
    #[validate(range(min = 1))]
    pub rental_id: i32,
    /// Date of the intended payment (YYYY-MM-DD)
    pub payment_date: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::get_payments,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::update_payment,
        crate::handlers::payments::delete_payment,
        crate::handlers::payments::get_period_summary,
        crate::handlers::payments::get_payment_statistics,
        crate::handlers::payments::get_payment_info,
    ),
    components(
        schemas(
            ApiResponse<PaymentResponse>,
            ApiResponse<Vec<PaymentResponse>>,
            ApiResponse<PaymentDetail>,
            ApiResponse<PeriodSummary>,
            ApiResponse<PaymentStatistics>,
            ApiResponse<PaymentInfo>,
            ErrorResponse,
            HealthResponse,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            PaymentResponse,
            PaymentDetail,
            PeriodSummary,
            PaymentStatistics,
            PaymentInfo,
            PaymentStatus,
            PaymentListQuery,
            PeriodSummaryQuery,
            PaymentInfoQuery,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Rent payments and period balances"),
    ),
    info(
        title = "RentRust API",
        description = "Property rental management API - rent payments, period balances and outstanding totals",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
