//! Common transport-layer types shared between the aggregation engine and
//! the HTTP API. These structs are the JSON shapes consumers of the API see,
//! so the engine can hand them out without a separate mapping layer.

mod balance;
mod statistics;

pub use balance::{PaymentDetail, PaymentInfo, PaymentStatus, PeriodSummary};
pub use statistics::PaymentStatistics;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
/// The backend re-exports this from `schemas` so handlers and API clients
/// share one definition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}
