//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                            | Return Type         |
// |-----------------------|----------------------------------------|---------------------|
// | health                | Health check endpoint                  | Response            |
// | submit_order          | Validate and durably enqueue an order  | ApiResult<Response> |
// | cancel_order          | Durably enqueue a cancel request       | ApiResult<Response> |
// | book_stats            | Matcher observability snapshot         | Response            |
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{ApiError, ApiResult, AppState, CancelAck, OrderAck, SubmitOrderRequest};
use crate::types::Order;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Validates a submission and appends it to the durable order log.
///
/// Validation happens here, at the adapter boundary: a malformed order is
/// rejected with 400 and never produces a log record. On success the client
/// gets 202: accepted for matching, not executed.
pub async fn submit_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<SubmitOrderRequest>,
) -> ApiResult<Response> {
    // Construct the domain order purely to reuse its validation; the record
    // written below carries the submitted quantity from the request itself.
    Order::new(req.order_id.as_str(), req.side, req.price, req.quantity)?;

    state
        .log
        .lock()
        .append_submit(&req.order_id, req.side, req.price, req.quantity)?;

    tracing::debug!(order_id = %req.order_id, "order accepted");
    let ack = OrderAck::accepted(req.order_id);
    Ok((StatusCode::ACCEPTED, Json(ack)).into_response())
}

/// Appends a cancel record for the given order id.
///
/// The cancel travels through the same log as submissions so that all book
/// mutation stays on the matcher thread; a race with a fill is resolved by
/// log order.
pub async fn cancel_order(
    Extension(state): Extension<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> ApiResult<Response> {
    if order_id.is_empty() {
        return Err(ApiError::BadRequest("order id must not be empty".into()));
    }

    state.log.lock().append_cancel(&order_id)?;

    tracing::debug!(order_id = %order_id, "cancel accepted");
    let ack = CancelAck::accepted(order_id);
    Ok((StatusCode::ACCEPTED, Json(ack)).into_response())
}

/// Read-only matcher observability: best bid/ask, resting counts, cumulative
/// trade count.
pub async fn book_stats(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.stats.snapshot())
}
