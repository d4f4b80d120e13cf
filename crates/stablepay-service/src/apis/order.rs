//! Order endpoint handlers.

use crate::apis::ApiError;
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use stablepay_types::{
	ConfirmCreateOrderRequest, ConfirmOrderRequest, CreateOrderConfirmation, CreateOrderRequest,
	OrderRecord, OrderRequest, OrderTransitionConfirmation, PrepareCreateOrderResponse,
	PrepareOrderResponse,
};

/// Handles POST /api/orders/prepare-create.
pub async fn prepare_create(
	State(state): State<AppState>,
	Json(request): Json<CreateOrderRequest>,
) -> Result<Json<PrepareCreateOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_create_order(&request)?))
}

/// Handles POST /api/orders/confirm-create.
pub async fn confirm_create(
	State(state): State<AppState>,
	Json(request): Json<ConfirmCreateOrderRequest>,
) -> Result<Json<CreateOrderConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_create_order(&request).await?))
}

/// Handles POST /api/orders/prepare-pay.
pub async fn prepare_pay(
	State(state): State<AppState>,
	Json(request): Json<OrderRequest>,
) -> Result<Json<PrepareOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_pay_order(&request)?))
}

/// Handles POST /api/orders/confirm-pay.
pub async fn confirm_pay(
	State(state): State<AppState>,
	Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderTransitionConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_pay_order(&request).await?))
}

/// Handles POST /api/orders/prepare-cancel.
pub async fn prepare_cancel(
	State(state): State<AppState>,
	Json(request): Json<OrderRequest>,
) -> Result<Json<PrepareOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_cancel_order(&request).await?))
}

/// Handles POST /api/orders/confirm-cancel.
pub async fn confirm_cancel(
	State(state): State<AppState>,
	Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderTransitionConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_cancel_order(&request).await?))
}

/// Handles GET /api/orders/{order_id}.
pub async fn get_order(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<OrderRecord>, ApiError> {
	Ok(Json(state.staging.get_order(&order_id).await?))
}
