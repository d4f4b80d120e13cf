//! Merchant endpoint handlers.

use crate::apis::ApiError;
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{json, Value};
use stablepay_types::{
	ConfirmTransactionRequest, ConfirmUpdateMerchantRequest, MerchantBalanceResponse,
	MerchantResponse, MerchantVerifiedResponse, OrderTransitionConfirmation,
	PrepareOrderResponse, PrepareUpdateMerchantResponse, RegisterMerchantRequest,
	TokenBalanceRequest, UpdateMerchantRequest,
};

/// Handles POST /api/merchants/register.
pub async fn register(
	State(state): State<AppState>,
	Json(request): Json<RegisterMerchantRequest>,
) -> Result<Json<MerchantResponse>, ApiError> {
	Ok(Json(state.staging.register_merchant(&request).await?))
}

/// Handles GET /api/merchants/{merchant_id}.
pub async fn get_merchant(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<MerchantResponse>, ApiError> {
	Ok(Json(state.staging.get_merchant(&merchant_id).await?))
}

/// Handles DELETE /api/merchants/{merchant_id}.
pub async fn delete_merchant(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
	state.staging.delete_merchant(&merchant_id).await?;
	Ok(Json(json!({
		"merchantId": merchant_id,
		"message": "Merchant deleted successfully",
	})))
}

/// Handles GET /api/merchants/{merchant_id}/verified.
pub async fn is_verified(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<MerchantVerifiedResponse>, ApiError> {
	Ok(Json(state.staging.is_merchant_verified(&merchant_id).await?))
}

/// Handles POST /api/merchants/{merchant_id}/balance.
pub async fn balance(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<TokenBalanceRequest>,
) -> Result<Json<MerchantBalanceResponse>, ApiError> {
	Ok(Json(
		state
			.staging
			.get_merchant_balance(&merchant_id, &request)
			.await?,
	))
}

/// Handles POST /api/merchants/prepare-update/{merchant_id}.
pub async fn prepare_update(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<UpdateMerchantRequest>,
) -> Result<Json<PrepareUpdateMerchantResponse>, ApiError> {
	Ok(Json(
		state
			.staging
			.prepare_update_merchant(&merchant_id, &request)
			.await?,
	))
}

/// Handles POST /api/merchants/confirm-update/{merchant_id}.
pub async fn confirm_update(
	Path(merchant_id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<ConfirmUpdateMerchantRequest>,
) -> Result<Json<MerchantResponse>, ApiError> {
	Ok(Json(
		state
			.staging
			.confirm_update_merchant(&merchant_id, &request)
			.await?,
	))
}

/// Handles POST /api/merchants/prepare-refund/{order_id}.
pub async fn prepare_refund(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<PrepareOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_merchant_refund(&order_id).await?))
}

/// Handles POST /api/merchants/confirm-refund/{order_id}.
pub async fn confirm_refund(
	Path(order_id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<ConfirmTransactionRequest>,
) -> Result<Json<OrderTransitionConfirmation>, ApiError> {
	Ok(Json(
		state
			.staging
			.confirm_merchant_refund(&order_id, &request)
			.await?,
	))
}
