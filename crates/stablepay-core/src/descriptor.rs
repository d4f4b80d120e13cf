//! Unsigned call descriptor construction.
//!
//! The descriptor builder turns a validated domain operation into a
//! [`TransactionDescriptor`] without touching persistent state or the
//! chain: a pure function of its inputs plus the static contract-address
//! configuration. Validation always completes before any encoding starts,
//! so a descriptor is never partially built.

use crate::abi::{IMerchantRegistry, IPaymentProcessor, IERC20};
use crate::StagingError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use stablepay_types::{
	format_address, parse_address, with_0x_prefix, Bytes32Id, TransactionDescriptor,
	TransactionHash,
};

/// Static gas-limit ceilings per operation type.
///
/// Conservative estimates, not simulation results; a wallet may lower them
/// before signing.
pub const GAS_LIMIT_APPROVE: u64 = 100_000;
pub const GAS_LIMIT_CREATE_ORDER: u64 = 300_000;
pub const GAS_LIMIT_PAY_ORDER: u64 = 300_000;
pub const GAS_LIMIT_SETTLE_ORDER: u64 = 300_000;
pub const GAS_LIMIT_REFUND_ORDER: u64 = 300_000;
pub const GAS_LIMIT_CANCEL_ORDER: u64 = 300_000;
pub const GAS_LIMIT_UPDATE_MERCHANT: u64 = 200_000;
pub const GAS_LIMIT_MERCHANT_REFUND: u64 = 150_000;

/// Builds unsigned call descriptors for client wallets to sign.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
	chain_id: u64,
	payment_processor: Address,
	merchant_registry: Address,
}

impl DescriptorBuilder {
	/// Creates a builder bound to one network's contract addresses.
	pub fn new(chain_id: u64, payment_processor: Address, merchant_registry: Address) -> Self {
		Self {
			chain_id,
			payment_processor,
			merchant_registry,
		}
	}

	/// Address of the configured PaymentProcessor contract.
	pub fn payment_processor(&self) -> Address {
		self.payment_processor
	}

	fn descriptor(&self, to: Address, data: Vec<u8>, gas_limit: u64) -> TransactionDescriptor {
		TransactionDescriptor {
			to: format_address(&to),
			data: with_0x_prefix(&hex::encode(data)),
			chain_id: self.chain_id,
			value: "0".to_string(),
			gas_limit,
		}
	}

	/// ERC-20 approval of the payment processor as spender.
	///
	/// A zero amount is allowed; it revokes an earlier approval.
	pub fn approve_token(
		&self,
		token_address: &str,
		amount: &str,
	) -> Result<TransactionDescriptor, StagingError> {
		let token = parse_field_address("tokenAddress", token_address)?;
		let value = parse_amount("amount", amount, false)?;

		let data = IERC20::approveCall {
			spender: self.payment_processor,
			value,
		}
		.abi_encode();

		Ok(self.descriptor(token, data, GAS_LIMIT_APPROVE))
	}

	/// Order creation against the payment processor.
	pub fn create_order(
		&self,
		merchant_id: &str,
		token_address: &str,
		amount: &str,
		metadata_uri: &str,
	) -> Result<TransactionDescriptor, StagingError> {
		let merchant = parse_field_id("merchantId", merchant_id)?;
		let token = parse_field_address("tokenAddress", token_address)?;
		let value = parse_amount("amount", amount, true)?;
		require_non_empty("metadataURI", metadata_uri)?;

		let data = IPaymentProcessor::createOrderCall {
			_merchantId: merchant.0,
			_token: token,
			_amount: value,
			_metadataUri: metadata_uri.to_string(),
		}
		.abi_encode();

		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_CREATE_ORDER))
	}

	/// Payment of an existing order.
	pub fn pay_order(&self, order_id: &str) -> Result<TransactionDescriptor, StagingError> {
		let order = parse_field_id("orderId", order_id)?;
		let data = IPaymentProcessor::payOrderCall { _orderId: order.0 }.abi_encode();
		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_PAY_ORDER))
	}

	/// Settlement of a paid order to the merchant.
	pub fn settle_order(&self, order_id: &str) -> Result<TransactionDescriptor, StagingError> {
		let order = parse_field_id("orderId", order_id)?;
		let data = IPaymentProcessor::settleOrderCall { _orderId: order.0 }.abi_encode();
		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_SETTLE_ORDER))
	}

	/// Refund of a paid or settled order to the payer.
	pub fn refund_order(&self, order_id: &str) -> Result<TransactionDescriptor, StagingError> {
		let order = parse_field_id("orderId", order_id)?;
		let data = IPaymentProcessor::refundOrderCall { _orderId: order.0 }.abi_encode();
		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_REFUND_ORDER))
	}

	/// Merchant-initiated refund; same contract call, lower ceiling.
	pub fn merchant_refund_order(
		&self,
		order_id: &str,
	) -> Result<TransactionDescriptor, StagingError> {
		let order = parse_field_id("orderId", order_id)?;
		let data = IPaymentProcessor::refundOrderCall { _orderId: order.0 }.abi_encode();
		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_MERCHANT_REFUND))
	}

	/// Cancellation of an order before settlement.
	pub fn cancel_order(&self, order_id: &str) -> Result<TransactionDescriptor, StagingError> {
		let order = parse_field_id("orderId", order_id)?;
		let data = IPaymentProcessor::cancelOrderCall { _orderId: order.0 }.abi_encode();
		Ok(self.descriptor(self.payment_processor, data, GAS_LIMIT_CANCEL_ORDER))
	}

	/// Merchant field update against the registry.
	pub fn update_merchant(
		&self,
		merchant_id: &str,
		payout_wallet_address: &str,
		metadata_uri: &str,
	) -> Result<TransactionDescriptor, StagingError> {
		let merchant = parse_field_id("merchantId", merchant_id)?;
		let payout = parse_field_address("payoutWalletAddress", payout_wallet_address)?;
		require_non_empty("metadataURI", metadata_uri)?;

		let data = IMerchantRegistry::updateMerchantCall {
			_merchantId: merchant.0,
			_payoutWalletAddress: payout,
			_metadataUri: metadata_uri.to_string(),
		}
		.abi_encode();

		Ok(self.descriptor(self.merchant_registry, data, GAS_LIMIT_UPDATE_MERCHANT))
	}
}

// ---------------------------------------------------------------------------
// Input parsing helpers shared by the operation handlers
// ---------------------------------------------------------------------------

/// Parses a 32-byte id field, accepting bare or 0x-prefixed hex.
pub(crate) fn parse_field_id(
	field: &'static str,
	value: &str,
) -> Result<Bytes32Id, StagingError> {
	value
		.parse()
		.map_err(|e| StagingError::validation(field, format!("{}", e)))
}

/// Parses a 20-byte address field.
pub(crate) fn parse_field_address(
	field: &'static str,
	value: &str,
) -> Result<Address, StagingError> {
	parse_address(value).map_err(|e| StagingError::validation(field, format!("{}", e)))
}

/// Parses a transaction hash field.
pub(crate) fn parse_field_hash(
	field: &'static str,
	value: &str,
) -> Result<TransactionHash, StagingError> {
	value
		.parse()
		.map_err(|e| StagingError::validation(field, format!("{}", e)))
}

/// Parses a decimal amount in token base units.
pub(crate) fn parse_amount(
	field: &'static str,
	value: &str,
	strictly_positive: bool,
) -> Result<U256, StagingError> {
	let amount: U256 = value
		.parse()
		.map_err(|_| StagingError::validation(field, "must be a non-negative integer"))?;
	if strictly_positive && amount.is_zero() {
		return Err(StagingError::validation(field, "must be greater than zero"));
	}
	Ok(amount)
}

/// Rejects empty required string fields.
pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), StagingError> {
	if value.is_empty() {
		return Err(StagingError::validation(field, "is required"));
	}
	Ok(())
}
