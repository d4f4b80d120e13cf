//! Platform endpoint handlers.

use crate::apis::ApiError;
use crate::server::AppState;
use axum::extract::State;
use axum::response::Json;
use stablepay_types::{
	ApproveTokenRequest, BalanceResponse, ConfirmOrderRequest, ConfirmTransactionRequest,
	ContractBalanceRequest, EmergencyWithdrawRequest, MerchantVerificationRequest, OrderRequest,
	OrderTransitionConfirmation, PlatformBalanceRequest, PrepareApproveResponse,
	PrepareOrderResponse, RegistryUpdateRequest, TokenSupportRequest, TransactionConfirmation,
	VerificationStatusResponse, WithdrawalResponse, WithdrawalToggleRequest,
};

/// Handles POST /api/platform/approve-token.
pub async fn prepare_approve(
	State(state): State<AppState>,
	Json(request): Json<ApproveTokenRequest>,
) -> Result<Json<PrepareApproveResponse>, ApiError> {
	Ok(Json(state.staging.prepare_approve_token(&request)?))
}

/// Handles POST /api/platform/confirm-approve.
pub async fn confirm_approve(
	State(state): State<AppState>,
	Json(request): Json<ConfirmTransactionRequest>,
) -> Result<Json<TransactionConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_approve_token(&request).await?))
}

/// Handles POST /api/platform/prepare-settle.
pub async fn prepare_settle(
	State(state): State<AppState>,
	Json(request): Json<OrderRequest>,
) -> Result<Json<PrepareOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_settle_order(&request).await?))
}

/// Handles POST /api/platform/confirm-settle.
pub async fn confirm_settle(
	State(state): State<AppState>,
	Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderTransitionConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_settle_order(&request).await?))
}

/// Handles POST /api/platform/prepare-refund.
pub async fn prepare_refund(
	State(state): State<AppState>,
	Json(request): Json<OrderRequest>,
) -> Result<Json<PrepareOrderResponse>, ApiError> {
	Ok(Json(state.staging.prepare_refund_order(&request).await?))
}

/// Handles POST /api/platform/confirm-refund.
pub async fn confirm_refund(
	State(state): State<AppState>,
	Json(request): Json<ConfirmOrderRequest>,
) -> Result<Json<OrderTransitionConfirmation>, ApiError> {
	Ok(Json(state.staging.confirm_refund_order(&request).await?))
}

/// Handles POST /api/platform/emergency-withdrawal.
pub async fn emergency_withdraw(
	State(state): State<AppState>,
	Json(request): Json<EmergencyWithdrawRequest>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
	Ok(Json(state.staging.emergency_withdraw(&request).await?))
}

/// Handles POST /api/platform/enable-emergency-withdrawal.
pub async fn set_withdrawal_enabled(
	State(state): State<AppState>,
	Json(request): Json<WithdrawalToggleRequest>,
) -> Result<Json<TransactionConfirmation>, ApiError> {
	Ok(Json(
		state
			.staging
			.set_emergency_withdrawal_enabled(&request)
			.await?,
	))
}

/// Handles POST /api/platform/set-token-support.
pub async fn set_token_support(
	State(state): State<AppState>,
	Json(request): Json<TokenSupportRequest>,
) -> Result<Json<TransactionConfirmation>, ApiError> {
	Ok(Json(state.staging.set_token_support(&request).await?))
}

/// Handles POST /api/platform/merchant-verification-status.
pub async fn update_verification_status(
	State(state): State<AppState>,
	Json(request): Json<MerchantVerificationRequest>,
) -> Result<Json<VerificationStatusResponse>, ApiError> {
	Ok(Json(
		state
			.staging
			.update_merchant_verification_status(&request)
			.await?,
	))
}

/// Handles POST /api/platform/update-merchant-registry.
pub async fn update_merchant_registry(
	State(state): State<AppState>,
	Json(request): Json<RegistryUpdateRequest>,
) -> Result<Json<TransactionConfirmation>, ApiError> {
	Ok(Json(state.staging.update_merchant_registry(&request).await?))
}

/// Handles POST /api/platform/token-balance.
pub async fn platform_balance(
	State(state): State<AppState>,
	Json(request): Json<PlatformBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
	Ok(Json(state.staging.get_platform_token_balance(&request).await?))
}

/// Handles POST /api/platform/contract-token-balance.
pub async fn contract_balance(
	State(state): State<AppState>,
	Json(request): Json<ContractBalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
	Ok(Json(state.staging.get_contract_token_balance(&request).await?))
}
