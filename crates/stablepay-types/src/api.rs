//! API types for the stablepay HTTP surface.
//!
//! Request and response structures for the prepare/confirm endpoints and
//! the platform administration operations. All wire names are camelCase,
//! matching the storage record serialization.

use crate::{
	MerchantRecord, OrderRecord, OrderStatus, TokenBalanceRecord, TransactionDescriptor,
	VerificationStatus, WithdrawalRecord,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to prepare an ERC-20 approval for the payment processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveTokenRequest {
	pub token_address: String,
	pub amount: String,
}

/// Request to confirm a previously prepared transaction by hash only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTransactionRequest {
	pub transaction_hash: String,
}

/// Request to prepare an order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
	pub merchant_id: String,
	pub token_address: String,
	pub amount: String,
	#[serde(rename = "metadataURI")]
	pub metadata_uri: String,
}

/// Request to confirm an order creation.
///
/// The client echoes the prepared fields together with the transaction
/// hash; the order id itself is extracted from the transaction logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCreateOrderRequest {
	pub transaction_hash: String,
	pub merchant_id: String,
	pub token_address: String,
	pub amount: String,
	#[serde(rename = "metadataURI")]
	pub metadata_uri: String,
	pub payer_address: String,
}

/// Request addressing an existing order by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
	pub order_id: String,
}

/// Request to confirm an order transition by id and transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest {
	pub order_id: String,
	pub transaction_hash: String,
}

/// Request to register a new merchant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMerchantRequest {
	pub merchant_name: String,
	pub payout_wallet_address: String,
	#[serde(rename = "metadataURI")]
	pub metadata_uri: String,
}

/// Request to prepare a merchant update.
///
/// Omitted fields fall back to the currently persisted values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMerchantRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payout_wallet_address: Option<String>,
	#[serde(rename = "metadataURI", skip_serializing_if = "Option::is_none")]
	pub metadata_uri: Option<String>,
}

/// Request to confirm a merchant update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUpdateMerchantRequest {
	pub transaction_hash: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub merchant_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payout_wallet_address: Option<String>,
	#[serde(rename = "metadataURI", default, skip_serializing_if = "Option::is_none")]
	pub metadata_uri: Option<String>,
}

/// Request for a merchant wallet token balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceRequest {
	pub wallet_address: String,
	pub token_address: String,
}

/// Request for a platform-signed emergency withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyWithdrawRequest {
	pub token_address: String,
	pub receiver_address: String,
	pub amount: String,
}

/// Request to toggle emergency withdrawals on the payment processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalToggleRequest {
	pub is_withdrawal_enabled: bool,
}

/// Request to enable or disable support for a payment token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSupportRequest {
	pub token_address: String,
	/// Either "enabled" or "disabled".
	pub status_value: String,
}

/// Request to change a merchant's verification status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantVerificationRequest {
	pub merchant_id: String,
	pub verification_status: String,
}

/// Request to point the payment processor at a new merchant registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryUpdateRequest {
	pub new_registry_address: String,
}

/// Request for the contract-held balance of a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractBalanceRequest {
	pub token_address: String,
}

/// Request for a wallet's balance of a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformBalanceRequest {
	pub platform_wallet: String,
	pub token_address: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response to a prepared token approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareApproveResponse {
	pub transaction_data: TransactionDescriptor,
	pub token_address: String,
	pub spender: String,
	pub amount: String,
	pub message: String,
}

/// Response to a prepared order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareCreateOrderResponse {
	pub transaction_data: TransactionDescriptor,
	pub merchant_id: String,
	pub token_address: String,
	pub amount: String,
	#[serde(rename = "metadataURI")]
	pub metadata_uri: String,
	pub message: String,
}

/// Response to a prepared order transition (pay, settle, refund, cancel).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareOrderResponse {
	pub transaction_data: TransactionDescriptor,
	pub order_id: String,
	pub message: String,
}

/// Response to a prepared merchant update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareUpdateMerchantResponse {
	pub transaction_data: TransactionDescriptor,
	pub merchant_id: String,
	pub payout_wallet_address: String,
	#[serde(rename = "metadataURI")]
	pub metadata_uri: String,
	pub message: String,
}

/// Response to a confirmed transaction with no persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConfirmation {
	pub message: String,
	pub transaction_hash: String,
	pub explorer_url: String,
}

/// Response to a confirmed order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderConfirmation {
	pub order: OrderRecord,
	pub explorer_url: String,
}

/// Response to a confirmed order status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTransitionConfirmation {
	pub order_id: String,
	pub status: OrderStatus,
	pub transaction_hash: String,
	pub explorer_url: String,
	pub message: String,
}

/// Response describing a registered or fetched merchant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantResponse {
	pub merchant: MerchantRecord,
	pub explorer_url: String,
	pub message: String,
}

/// Response to a merchant verification status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantVerifiedResponse {
	pub is_verified: bool,
}

/// Response to a merchant verification status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
	pub merchant_id: String,
	pub verification_status: VerificationStatus,
	pub explorer_url: String,
}

/// Response to a token balance query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
	pub balance: String,
	pub message: String,
}

/// Response to a merchant balance query with the persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantBalanceResponse {
	#[serde(flatten)]
	pub snapshot: TokenBalanceRecord,
}

/// Response to a confirmed emergency withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalResponse {
	pub withdrawal: WithdrawalRecord,
	pub explorer_url: String,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
	/// Error type/code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
	/// Suggested retry delay in seconds, present for retryable conditions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub retry_after: Option<u64>,
}
