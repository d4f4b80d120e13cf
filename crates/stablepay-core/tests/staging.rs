//! End-to-end tests for the staging protocol against a mock chain client
//! and in-memory storage.

use alloy_primitives::{address, b256, Address, B256, U256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use stablepay_chain::{ChainError, ChainInterface};
use stablepay_core::abi::{IMerchantRegistry, IPaymentProcessor};
use stablepay_core::{StagingError, StagingService};
use stablepay_storage::{implementations::memory::MemoryStorage, StorageService};
use stablepay_types::{
	ApproveTokenRequest, ChainReceipt, ChainTransaction, ConfirmCreateOrderRequest,
	ConfirmOrderRequest, CreateOrderRequest, LogEntry, MerchantRecord, NetworkConfig,
	OrderRecord, OrderRequest, OrderStatus, RegisterMerchantRequest, StorageKey,
	UpdateMerchantRequest, VerificationStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const CHAIN_ID: u64 = 84532;
const MERCHANT_ID: B256 =
	b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const ORDER_ID: B256 = b256!("cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc");
const TOKEN: Address = address!("1111111111111111111111111111111111111111");
const PAYER: Address = address!("2222222222222222222222222222222222222222");
const PAYMENT_PROCESSOR: Address = address!("7c39408AC96a1b9a2722056eDE90b54D2B260380");
const MERCHANT_REGISTRY: Address = address!("93e93Dfa36C87De32B9118CA5D9BAd1Db892002d");

/// Chain client double with scripted receipts.
struct MockChain {
	receipts: Mutex<HashMap<B256, ChainReceipt>>,
	submitted: Mutex<Vec<ChainTransaction>>,
	/// Receipt handed out for the next platform-signed submission.
	submit_receipt: Mutex<Option<ChainReceipt>>,
	call_response: Vec<u8>,
}

impl MockChain {
	fn new() -> Self {
		Self {
			receipts: Mutex::new(HashMap::new()),
			submitted: Mutex::new(Vec::new()),
			submit_receipt: Mutex::new(None),
			call_response: Vec::new(),
		}
	}

	async fn insert_receipt(&self, receipt: ChainReceipt) {
		self.receipts.lock().await.insert(receipt.hash, receipt);
	}

	async fn script_submission(&self, receipt: ChainReceipt) {
		*self.submit_receipt.lock().await = Some(receipt);
	}
}

#[async_trait]
impl ChainInterface for MockChain {
	fn chain_id(&self) -> u64 {
		CHAIN_ID
	}

	async fn get_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError> {
		self.receipts
			.lock()
			.await
			.get(hash)
			.cloned()
			.ok_or(ChainError::TransactionNotFound)
	}

	async fn submit(&self, tx: ChainTransaction) -> Result<B256, ChainError> {
		self.submitted.lock().await.push(tx);
		let receipt = self
			.submit_receipt
			.lock()
			.await
			.take()
			.ok_or_else(|| ChainError::Network("no scripted receipt".into()))?;
		let hash = receipt.hash;
		self.insert_receipt(receipt).await;
		Ok(hash)
	}

	async fn wait_for_receipt(&self, hash: &B256) -> Result<ChainReceipt, ChainError> {
		self.get_receipt(hash).await
	}

	async fn call(&self, _to: Address, _data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
		Ok(self.call_response.clone())
	}

	async fn get_balance(
		&self,
		_address: Address,
		_token: Option<Address>,
	) -> Result<String, ChainError> {
		Ok("5000000".to_string())
	}
}

fn network() -> NetworkConfig {
	NetworkConfig {
		name: "base-sepolia".to_string(),
		rpc_url: "http://localhost:8545".to_string(),
		payment_processor_address: PAYMENT_PROCESSOR,
		merchant_registry_address: MERCHANT_REGISTRY,
		explorer_url: "https://sepolia.basescan.org".to_string(),
	}
}

fn harness() -> (Arc<MockChain>, Arc<StorageService>, StagingService) {
	let chain = Arc::new(MockChain::new());
	let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
	let service = StagingService::new(
		Arc::clone(&chain) as Arc<dyn ChainInterface>,
		Arc::clone(&storage),
		network(),
	);
	(chain, storage, service)
}

fn success_receipt(hash: B256, logs: Vec<LogEntry>) -> ChainReceipt {
	ChainReceipt {
		hash,
		block_number: 42,
		success: true,
		logs,
	}
}

fn failure_receipt(hash: B256) -> ChainReceipt {
	ChainReceipt {
		hash,
		block_number: 42,
		success: false,
		logs: Vec::new(),
	}
}

fn order_created_log() -> LogEntry {
	let event = IPaymentProcessor::OrderCreated {
		orderId: ORDER_ID,
		payer: PAYER,
		merchantId: MERCHANT_ID,
		merchantPayout: address!("3333333333333333333333333333333333333333"),
		token: TOKEN,
		amount: U256::from(1_000_000u64),
		status: 0,
		metadataUri: "ipfs://x".to_string(),
	};
	let data = event.encode_log_data();
	LogEntry {
		address: PAYMENT_PROCESSOR,
		topics: data.topics().to_vec(),
		data: data.data.to_vec(),
	}
}

fn merchant_registered_log() -> LogEntry {
	let event = IMerchantRegistry::MerchantRegistered {
		merchantId: MERCHANT_ID,
		owner: PAYER,
		payoutWallet: address!("3333333333333333333333333333333333333333"),
		metadataUri: "ipfs://m".to_string(),
	};
	let data = event.encode_log_data();
	LogEntry {
		address: MERCHANT_REGISTRY,
		topics: data.topics().to_vec(),
		data: data.data.to_vec(),
	}
}

fn hex32(id: B256) -> String {
	format!("0x{}", hex::encode(id))
}

async fn seed_merchant(storage: &StorageService) {
	let merchant = MerchantRecord {
		merchant_id: hex32(MERCHANT_ID),
		merchant_name: "Acme".to_string(),
		payout_wallet_address: "0x3333333333333333333333333333333333333333".to_string(),
		metadata_uri: "ipfs://m".to_string(),
		verification_status: VerificationStatus::Pending,
		transaction_hash: hex32(B256::repeat_byte(0x01)),
		created_at: 1,
		updated_at: 1,
	};
	storage
		.store(StorageKey::Merchants.as_str(), &merchant.merchant_id, &merchant)
		.await
		.unwrap();
}

async fn seed_order(storage: &StorageService, status: OrderStatus) {
	let order = OrderRecord {
		order_id: hex32(ORDER_ID),
		merchant_id: hex32(MERCHANT_ID),
		payer_address: "0x2222222222222222222222222222222222222222".to_string(),
		token_address: "0x1111111111111111111111111111111111111111".to_string(),
		amount: "1000000".to_string(),
		status,
		metadata_uri: "ipfs://x".to_string(),
		transaction_hash: hex32(B256::repeat_byte(0x02)),
		created_at: 1,
		updated_at: 1,
	};
	storage
		.store(StorageKey::Orders.as_str(), &order.order_id, &order)
		.await
		.unwrap();
}

#[tokio::test]
async fn test_prepare_create_order_descriptor() {
	let (_chain, _storage, service) = harness();

	let response = service
		.prepare_create_order(&CreateOrderRequest {
			merchant_id: hex32(MERCHANT_ID),
			token_address: "0x1111111111111111111111111111111111111111".to_string(),
			amount: "1000000".to_string(),
			metadata_uri: "ipfs://x".to_string(),
		})
		.unwrap();

	assert_eq!(
		response.transaction_data.to,
		"0x7c39408ac96a1b9a2722056ede90b54d2b260380"
	);
	assert_eq!(response.transaction_data.gas_limit, 300_000);
	assert_eq!(response.transaction_data.chain_id, CHAIN_ID);
}

#[tokio::test]
async fn test_confirm_create_order_persists_record_from_event() {
	let (chain, storage, service) = harness();
	seed_merchant(&storage).await;

	let tx_hash = B256::repeat_byte(0x10);
	chain
		.insert_receipt(success_receipt(tx_hash, vec![order_created_log()]))
		.await;

	let response = service
		.confirm_create_order(&ConfirmCreateOrderRequest {
			transaction_hash: hex32(tx_hash),
			merchant_id: hex32(MERCHANT_ID),
			token_address: "0x1111111111111111111111111111111111111111".to_string(),
			amount: "1000000".to_string(),
			metadata_uri: "ipfs://x".to_string(),
			payer_address: "0x2222222222222222222222222222222222222222".to_string(),
		})
		.await
		.unwrap();

	assert_eq!(response.order.order_id, hex32(ORDER_ID));
	assert_eq!(response.order.status, OrderStatus::Created);

	let stored: OrderRecord = storage
		.retrieve(StorageKey::Orders.as_str(), &hex32(ORDER_ID))
		.await
		.unwrap();
	assert_eq!(stored.status, OrderStatus::Created);
	assert_eq!(stored.transaction_hash, hex32(tx_hash));
}

#[tokio::test]
async fn test_confirm_create_order_requires_known_merchant() {
	let (chain, _storage, service) = harness();

	let tx_hash = B256::repeat_byte(0x10);
	chain
		.insert_receipt(success_receipt(tx_hash, vec![order_created_log()]))
		.await;

	let err = service
		.confirm_create_order(&ConfirmCreateOrderRequest {
			transaction_hash: hex32(tx_hash),
			merchant_id: hex32(MERCHANT_ID),
			token_address: "0x1111111111111111111111111111111111111111".to_string(),
			amount: "1000000".to_string(),
			metadata_uri: "ipfs://x".to_string(),
			payer_address: "0x2222222222222222222222222222222222222222".to_string(),
		})
		.await
		.unwrap_err();

	assert!(matches!(err, StagingError::MerchantNotFound(_)));
}

#[tokio::test]
async fn test_confirm_create_order_without_event_is_loud() {
	let (chain, storage, service) = harness();
	seed_merchant(&storage).await;

	let tx_hash = B256::repeat_byte(0x10);
	chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

	let err = service
		.confirm_create_order(&ConfirmCreateOrderRequest {
			transaction_hash: hex32(tx_hash),
			merchant_id: hex32(MERCHANT_ID),
			token_address: "0x1111111111111111111111111111111111111111".to_string(),
			amount: "1000000".to_string(),
			metadata_uri: "ipfs://x".to_string(),
			payer_address: "0x2222222222222222222222222222222222222222".to_string(),
		})
		.await
		.unwrap_err();

	assert!(matches!(err, StagingError::EventNotFound(_)));
}

#[tokio::test]
async fn test_confirm_pay_transitions_created_to_paid() {
	let (chain, storage, service) = harness();
	seed_order(&storage, OrderStatus::Created).await;

	let tx_hash = B256::repeat_byte(0x20);
	chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

	let response = service
		.confirm_pay_order(&ConfirmOrderRequest {
			order_id: hex32(ORDER_ID),
			transaction_hash: hex32(tx_hash),
		})
		.await
		.unwrap();

	assert_eq!(response.status, OrderStatus::Paid);

	let stored: OrderRecord = storage
		.retrieve(StorageKey::Orders.as_str(), &hex32(ORDER_ID))
		.await
		.unwrap();
	assert_eq!(stored.status, OrderStatus::Paid);
	assert_eq!(stored.transaction_hash, hex32(tx_hash));
}

#[tokio::test]
async fn test_settle_rejected_unless_paid() {
	for status in [
		OrderStatus::Created,
		OrderStatus::Settled,
		OrderStatus::Refunded,
		OrderStatus::Cancelled,
	] {
		let (chain, storage, service) = harness();
		seed_order(&storage, status).await;

		let tx_hash = B256::repeat_byte(0x30);
		chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

		let err = service
			.confirm_settle_order(&ConfirmOrderRequest {
				order_id: hex32(ORDER_ID),
				transaction_hash: hex32(tx_hash),
			})
			.await
			.unwrap_err();

		match err {
			StagingError::InvalidState { current, requested } => {
				assert_eq!(current, status);
				assert_eq!(requested, "settle");
			}
			other => panic!("expected InvalidState, got {:?}", other),
		}
	}
}

#[tokio::test]
async fn test_settle_prepare_rejects_created_order() {
	let (_chain, storage, service) = harness();
	seed_order(&storage, OrderStatus::Created).await;

	let err = service
		.prepare_settle_order(&OrderRequest {
			order_id: hex32(ORDER_ID),
		})
		.await
		.unwrap_err();

	let message = err.to_string();
	assert!(message.contains("created"), "message: {}", message);
}

#[tokio::test]
async fn test_refund_accepted_from_paid_and_settled() {
	for status in [OrderStatus::Paid, OrderStatus::Settled] {
		let (chain, storage, service) = harness();
		seed_order(&storage, status).await;

		let tx_hash = B256::repeat_byte(0x40);
		chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

		let response = service
			.confirm_refund_order(&ConfirmOrderRequest {
				order_id: hex32(ORDER_ID),
				transaction_hash: hex32(tx_hash),
			})
			.await
			.unwrap();
		assert_eq!(response.status, OrderStatus::Refunded);
	}

	for status in [
		OrderStatus::Created,
		OrderStatus::Refunded,
		OrderStatus::Cancelled,
	] {
		let (chain, storage, service) = harness();
		seed_order(&storage, status).await;

		let tx_hash = B256::repeat_byte(0x41);
		chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

		let err = service
			.confirm_refund_order(&ConfirmOrderRequest {
				order_id: hex32(ORDER_ID),
				transaction_hash: hex32(tx_hash),
			})
			.await
			.unwrap_err();
		assert!(matches!(err, StagingError::InvalidState { .. }));
	}
}

#[tokio::test]
async fn test_reverted_transaction_never_transitions() {
	let (chain, storage, service) = harness();
	seed_order(&storage, OrderStatus::Created).await;

	let tx_hash = B256::repeat_byte(0x50);
	chain.insert_receipt(failure_receipt(tx_hash)).await;

	let err = service
		.confirm_pay_order(&ConfirmOrderRequest {
			order_id: hex32(ORDER_ID),
			transaction_hash: hex32(tx_hash),
		})
		.await
		.unwrap_err();
	assert!(matches!(err, StagingError::ExecutionReverted));
	assert!(!err.is_retryable());

	let stored: OrderRecord = storage
		.retrieve(StorageKey::Orders.as_str(), &hex32(ORDER_ID))
		.await
		.unwrap();
	assert_eq!(stored.status, OrderStatus::Created);
}

#[tokio::test]
async fn test_pending_receipt_leaves_record_unchanged() {
	let (_chain, storage, service) = harness();
	seed_order(&storage, OrderStatus::Created).await;

	// No receipt scripted for this hash: the transaction is not mined.
	let err = service
		.confirm_pay_order(&ConfirmOrderRequest {
			order_id: hex32(ORDER_ID),
			transaction_hash: hex32(B256::repeat_byte(0x60)),
		})
		.await
		.unwrap_err();

	assert!(matches!(err, StagingError::ReceiptPending));
	assert!(err.is_retryable());

	let stored: OrderRecord = storage
		.retrieve(StorageKey::Orders.as_str(), &hex32(ORDER_ID))
		.await
		.unwrap();
	assert_eq!(stored.status, OrderStatus::Created);
	assert_eq!(stored.transaction_hash, hex32(B256::repeat_byte(0x02)));
}

#[tokio::test]
async fn test_cancel_allowed_before_terminal_states() {
	for status in [OrderStatus::Created, OrderStatus::Paid, OrderStatus::Settled] {
		let (chain, storage, service) = harness();
		seed_order(&storage, status).await;

		let tx_hash = B256::repeat_byte(0x70);
		chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

		let response = service
			.confirm_cancel_order(&ConfirmOrderRequest {
				order_id: hex32(ORDER_ID),
				transaction_hash: hex32(tx_hash),
			})
			.await
			.unwrap();
		assert_eq!(response.status, OrderStatus::Cancelled);
	}
}

#[tokio::test]
async fn test_confirm_unknown_order_is_not_found() {
	let (_chain, _storage, service) = harness();

	let err = service
		.confirm_pay_order(&ConfirmOrderRequest {
			order_id: hex32(ORDER_ID),
			transaction_hash: hex32(B256::repeat_byte(0x20)),
		})
		.await
		.unwrap_err();
	assert!(matches!(err, StagingError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_register_merchant_derives_id_from_event() {
	let (chain, storage, service) = harness();

	let tx_hash = B256::repeat_byte(0x80);
	chain
		.script_submission(success_receipt(tx_hash, vec![merchant_registered_log()]))
		.await;

	let response = service
		.register_merchant(&RegisterMerchantRequest {
			merchant_name: "Acme".to_string(),
			payout_wallet_address: "0x3333333333333333333333333333333333333333".to_string(),
			metadata_uri: "ipfs://m".to_string(),
		})
		.await
		.unwrap();

	assert_eq!(response.merchant.merchant_id, hex32(MERCHANT_ID));
	assert_eq!(
		response.merchant.verification_status,
		VerificationStatus::Pending
	);

	let stored: MerchantRecord = storage
		.retrieve(StorageKey::Merchants.as_str(), &hex32(MERCHANT_ID))
		.await
		.unwrap();
	assert_eq!(stored.merchant_name, "Acme");

	// The registration call went to the registry contract.
	let submitted = chain.submitted.lock().await;
	assert_eq!(submitted.len(), 1);
	assert_eq!(submitted[0].to, MERCHANT_REGISTRY);
}

#[tokio::test]
async fn test_prepare_update_merchant_falls_back_to_current_fields() {
	let (_chain, storage, service) = harness();
	seed_merchant(&storage).await;

	let response = service
		.prepare_update_merchant(
			&hex32(MERCHANT_ID),
			&UpdateMerchantRequest {
				payout_wallet_address: Some(
					"0x4444444444444444444444444444444444444444".to_string(),
				),
				metadata_uri: None,
			},
		)
		.await
		.unwrap();

	// Omitted metadata falls back to the stored value.
	assert_eq!(response.metadata_uri, "ipfs://m");
	assert_eq!(
		response.payout_wallet_address,
		"0x4444444444444444444444444444444444444444"
	);
	assert_eq!(response.transaction_data.gas_limit, 200_000);

	let err = service
		.prepare_update_merchant(
			&hex32(MERCHANT_ID),
			&UpdateMerchantRequest {
				payout_wallet_address: None,
				metadata_uri: None,
			},
		)
		.await
		.unwrap_err();
	assert!(matches!(err, StagingError::Validation { .. }));
}

#[tokio::test]
async fn test_approve_flow() {
	let (chain, _storage, service) = harness();

	let prepared = service
		.prepare_approve_token(&ApproveTokenRequest {
			token_address: "0x1111111111111111111111111111111111111111".to_string(),
			amount: "1000000".to_string(),
		})
		.unwrap();
	assert_eq!(prepared.transaction_data.gas_limit, 100_000);
	assert_eq!(prepared.spender, "0x7c39408ac96a1b9a2722056ede90b54d2b260380");

	let tx_hash = B256::repeat_byte(0x90);
	chain.insert_receipt(success_receipt(tx_hash, vec![])).await;

	let confirmed = service
		.confirm_approve_token(&stablepay_types::ConfirmTransactionRequest {
			transaction_hash: hex32(tx_hash),
		})
		.await
		.unwrap();
	assert!(confirmed.explorer_url.ends_with(&hex32(tx_hash)));
}
