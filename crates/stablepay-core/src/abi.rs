//! Contract ABI definitions for the payment system.
//!
//! Solidity surfaces of the deployed contracts, limited to the functions
//! and events the backend actually encodes or decodes.

use alloy_sol_types::sol;

sol! {
	/// PaymentProcessor contract: order lifecycle and platform operations.
	interface IPaymentProcessor {
		function createOrder(bytes32 _merchantId, address _token, uint256 _amount, string _metadataUri) external returns (bytes32 _orderId);
		function payOrder(bytes32 _orderId) external returns (bool);
		function settleOrder(bytes32 _orderId) external returns (bool);
		function refundOrder(bytes32 _orderId) external returns (bool);
		function cancelOrder(bytes32 _orderId) external returns (bool);
		function emergencyWithdraw(address _token, address _receiver, uint256 _amount) external;
		function setEmergencyWithdrawalEnabled(bool _enabled) external;
		function setTokenSupport(address _token, uint256 _status) external;
		function updateMerchantVerificationStatus(bytes32 _merchantId, uint8 _status) external;
		function updateMerchantRegistry(address _newRegistry) external;

		event OrderCreated(
			bytes32 indexed orderId,
			address indexed payer,
			bytes32 indexed merchantId,
			address merchantPayout,
			address token,
			uint256 amount,
			uint8 status,
			string metadataUri
		);
	}

	/// MerchantRegistry contract: registration and merchant metadata.
	interface IMerchantRegistry {
		function registerMerchant(address _payoutWalletAddress, string _metadataUri) external returns (bytes32 _merchantId);
		function updateMerchant(bytes32 _merchantId, address _payoutWalletAddress, string _metadataUri) external;
		function isMerchantVerified(bytes32 _merchantId) external view returns (bool);

		event MerchantRegistered(
			bytes32 indexed merchantId,
			address indexed owner,
			address payoutWallet,
			string metadataUri
		);
	}

	/// ERC-20 surface used for approvals and balance queries.
	interface IERC20 {
		function approve(address spender, uint256 value) external returns (bool);
		function balanceOf(address account) external view returns (uint256);
		function allowance(address owner, address spender) external view returns (uint256);
	}
}
