use crate::schemas::{
    ApiResponse, AppState, CachedData, ErrorResponse, PaymentInfoQuery, PaymentListQuery, PeriodSummaryQuery,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use common::{PaymentDetail, PaymentInfo, PaymentStatistics, PeriodSummary};
use compute::error::ComputeError;
use compute::payment::query::{self as payment_query, PaymentFilter};
use compute::payment::validation::{parse_payment_date, parse_payment_method};
use compute::{NewPayment, PaymentChanges};
use model::entities::payment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for recording a payment
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePaymentRequest {
    /// Paying tenant
    #[validate(range(min = 1))]
    pub tenant_id: i32,
    /// Rental the payment is for
    #[validate(range(min = 1))]
    pub rental_id: i32,
    /// Amount paid, at most two fractional digits
    pub amount: Decimal,
    /// Date of the payment (YYYY-MM-DD)
    pub payment_date: String,
    /// CASH, CARD or MOBILE
    pub payment_method: String,
    /// Billing period (YYYY-MM), defaults to the month of `payment_date`
    pub period_label: Option<String>,
}

/// Request body for editing a payment. Tenant, rental and period cannot change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePaymentRequest {
    pub amount: Option<Decimal>,
    /// New date (YYYY-MM-DD); the payment keeps its billing period
    pub payment_date: Option<String>,
    pub payment_method: Option<String>,
}

/// Payment response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub payment_reference: String,
    pub tenant_id: i32,
    pub rental_id: i32,
    pub amount: Decimal,
    /// Balance of the period right after this payment
    pub amount_due: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub period_label: String,
}

impl From<payment::Model> for PaymentResponse {
    fn from(model: payment::Model) -> Self {
        Self {
            id: model.id,
            payment_reference: model.payment_reference,
            tenant_id: model.tenant_id,
            rental_id: model.rental_id,
            amount: model.amount,
            amount_due: model.amount_due,
            payment_date: model.payment_date,
            payment_method: model.payment_method.to_string(),
            period_label: model.period_label,
        }
    }
}

impl From<PaymentListQuery> for PaymentFilter {
    fn from(query: PaymentListQuery) -> Self {
        Self {
            tenant_id: query.tenant_id,
            rental_id: query.rental_id,
            period_label: query.period_label,
        }
    }
}

/// Maps an engine error onto a status code and a stable error code
fn error_response(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        ComputeError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ComputeError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ComputeError::ConsistencyViolation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONSISTENCY_VIOLATION"),
        ComputeError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }

    let error = match &err {
        ComputeError::NotFound(what) => format!("{} not found", what),
        ComputeError::Validation(message) => message.clone(),
        ComputeError::ConsistencyViolation(_) => "Payment balances are inconsistent, change rolled back".to_string(),
        ComputeError::Database(_) => "Database error occurred".to_string(),
    };

    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Tenant or rental not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_payment(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePaymentRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_payment function");
    debug!(
        "Creating payment for tenant_id: {}, rental_id: {}, amount: {}",
        request.tenant_id, request.rental_id, request.amount
    );

    let payment_date = parse_payment_date(&request.payment_date).map_err(error_response)?;
    let payment_method = parse_payment_method(&request.payment_method).map_err(error_response)?;

    let new_payment = NewPayment {
        tenant_id: request.tenant_id,
        rental_id: request.rental_id,
        amount: request.amount,
        payment_date,
        payment_method,
        period_label: request.period_label,
    };

    match state.ledger.create_payment(new_payment).await {
        Ok(created) => {
            state.cache.invalidate_all();
            info!("Payment {} created successfully", created.payment_reference);
            let response = ApiResponse {
                data: PaymentResponse::from(created),
                message: "Payment created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// List payments, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payments(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PaymentListQuery>>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payments function");

    let filter = PaymentFilter::from(query);
    let payments = payment_query::list_payments(&state.db, &filter).await.map_err(error_response)?;

    info!("Successfully retrieved {} payments", payments.len());
    let response = ApiResponse {
        data: payments.into_iter().map(PaymentResponse::from).collect(),
        message: "Payments retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a payment together with the balance of its period
#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_reference}",
    tag = "payments",
    params(
        ("payment_reference" = String, Path, description = "Payment reference, e.g. PAY-0001"),
    ),
    responses(
        (status = 200, description = "Payment retrieved successfully", body = ApiResponse<PaymentDetail>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payment(
    Path(payment_reference): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaymentDetail>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payment function for {}", payment_reference);

    let detail = payment_query::payment_detail(&state.db, &payment_reference)
        .await
        .map_err(error_response)?;

    debug!(
        "Payment {} is {} with {} remaining",
        detail.payment_reference, detail.payment_status, detail.remaining_balance
    );
    let response = ApiResponse {
        data: detail,
        message: "Payment retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Edit the amount, date or method of a payment
#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_reference}",
    tag = "payments",
    params(
        ("payment_reference" = String, Path, description = "Payment reference, e.g. PAY-0001"),
    ),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_payment(
    Path(payment_reference): Path<String>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePaymentRequest>>,
) -> Result<Json<ApiResponse<PaymentResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_payment function for {}", payment_reference);

    let changes = PaymentChanges {
        amount: request.amount,
        payment_date: request
            .payment_date
            .as_deref()
            .map(parse_payment_date)
            .transpose()
            .map_err(error_response)?,
        payment_method: request
            .payment_method
            .as_deref()
            .map(parse_payment_method)
            .transpose()
            .map_err(error_response)?,
    };

    match state.ledger.update_payment(&payment_reference, changes).await {
        Ok(updated) => {
            state.cache.invalidate_all();
            info!("Payment {} updated successfully", updated.payment_reference);
            let response = ApiResponse {
                data: PaymentResponse::from(updated),
                message: "Payment updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Delete a payment
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{payment_reference}",
    tag = "payments",
    params(
        ("payment_reference" = String, Path, description = "Payment reference, e.g. PAY-0001"),
    ),
    responses(
        (status = 200, description = "Payment deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_payment(
    Path(payment_reference): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_payment function for {}", payment_reference);

    match state.ledger.delete_payment(&payment_reference).await {
        Ok(key) => {
            state.cache.invalidate_all();
            info!("Payment {} deleted, {} recomputed", payment_reference, key);
            let response = ApiResponse {
                data: format!("Payment {} deleted", payment_reference),
                message: "Payment deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Balance of one billing period
#[utoipa::path(
    get,
    path = "/api/v1/payments/summary",
    tag = "payments",
    params(PeriodSummaryQuery),
    responses(
        (status = 200, description = "Period summary computed successfully", body = ApiResponse<PeriodSummary>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Tenant or rental not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_period_summary(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PeriodSummaryQuery>>,
) -> Result<Json<ApiResponse<PeriodSummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_period_summary function");

    let summary = payment_query::period_summary(&state.db, query.tenant_id, query.rental_id, &query.period_label)
        .await
        .map_err(error_response)?;

    let response = ApiResponse {
        data: summary,
        message: "Period summary computed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Dashboard totals over the filtered payments
#[utoipa::path(
    get,
    path = "/api/v1/payments/statistics",
    tag = "payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Payment statistics computed successfully", body = ApiResponse<PaymentStatistics>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payment_statistics(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PaymentListQuery>>,
) -> Result<Json<ApiResponse<PaymentStatistics>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payment_statistics function");

    let today = Utc::now().date_naive();
    let cache_key = format!("payment_stats_{}_{:?}", today, query);

    if let Some(CachedData::Statistics(stats)) = state.cache.get(&cache_key).await {
        debug!("Payment statistics served from cache");
        let response = ApiResponse {
            data: stats,
            message: "Payment statistics retrieved from cache".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let filter = PaymentFilter::from(query);
    let stats = payment_query::statistics(&state.db, &filter, today)
        .await
        .map_err(error_response)?;

    state
        .cache
        .insert(cache_key, CachedData::Statistics(stats.clone()))
        .await;

    info!(
        "Computed statistics over {} payments, {} outstanding",
        stats.total_payments, stats.total_amount_due
    );
    let response = ApiResponse {
        data: stats,
        message: "Payment statistics computed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Pre-fill data for a new payment of a tenant
#[utoipa::path(
    get,
    path = "/api/v1/payments/info",
    tag = "payments",
    params(PaymentInfoQuery),
    responses(
        (status = 200, description = "Payment info retrieved successfully", body = ApiResponse<PaymentInfo>),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 404, description = "Tenant or rental not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_payment_info(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PaymentInfoQuery>>,
) -> Result<Json<ApiResponse<PaymentInfo>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_payment_info function");

    let info = payment_query::payment_info(&state.db, query.tenant_id, query.rental_id, &query.payment_date)
        .await
        .map_err(error_response)?;

    let response = ApiResponse {
        data: info,
        message: "Payment info retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
