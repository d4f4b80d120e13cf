//! Merchant records and verification status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform verification status of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
	/// Registered but not yet reviewed.
	Pending,
	/// Approved by the platform.
	Verified,
	/// Review failed.
	Rejected,
	/// Previously verified, currently suspended.
	Suspended,
}

impl VerificationStatus {
	/// Returns the storage string representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			VerificationStatus::Pending => "pending",
			VerificationStatus::Verified => "verified",
			VerificationStatus::Rejected => "rejected",
			VerificationStatus::Suspended => "suspended",
		}
	}

	/// Returns the numeric value used by the registry contract.
	pub fn as_u8(&self) -> u8 {
		match self {
			VerificationStatus::Pending => 0,
			VerificationStatus::Verified => 1,
			VerificationStatus::Rejected => 2,
			VerificationStatus::Suspended => 3,
		}
	}
}

impl fmt::Display for VerificationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for VerificationStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(VerificationStatus::Pending),
			"verified" => Ok(VerificationStatus::Verified),
			"rejected" => Ok(VerificationStatus::Rejected),
			"suspended" => Ok(VerificationStatus::Suspended),
			other => Err(format!("unknown verification status '{}'", other)),
		}
	}
}

/// Persisted merchant record.
///
/// The merchant id is derived from the on-chain MerchantRegistered event,
/// never from client input, and is immutable once assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRecord {
	/// 32-byte merchant id.
	pub merchant_id: String,
	/// Display name supplied at registration.
	pub merchant_name: String,
	/// Address receiving settled funds.
	pub payout_wallet_address: String,
	/// Opaque metadata reference.
	pub metadata_uri: String,
	/// Current platform verification status.
	pub verification_status: VerificationStatus,
	/// Hash of the last chain transaction associated with this merchant.
	pub transaction_hash: String,
	/// Timestamp when this record was created.
	pub created_at: u64,
	/// Timestamp when this record was last updated.
	pub updated_at: u64,
}

/// Last observed token balance for a merchant wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceRecord {
	pub merchant_id: String,
	pub wallet_address: String,
	pub token_address: String,
	/// Balance in token base units at observation time.
	pub token_balance: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_verification_status_contract_values() {
		assert_eq!(VerificationStatus::Pending.as_u8(), 0);
		assert_eq!(VerificationStatus::Verified.as_u8(), 1);
		assert_eq!(VerificationStatus::Rejected.as_u8(), 2);
		assert_eq!(VerificationStatus::Suspended.as_u8(), 3);
	}

	#[test]
	fn test_verification_status_roundtrip() {
		for status in [
			VerificationStatus::Pending,
			VerificationStatus::Verified,
			VerificationStatus::Rejected,
			VerificationStatus::Suspended,
		] {
			assert_eq!(status.as_str().parse::<VerificationStatus>(), Ok(status));
		}
		assert!("unknown".parse::<VerificationStatus>().is_err());
	}
}
