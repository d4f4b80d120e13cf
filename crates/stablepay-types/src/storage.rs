//! Storage-related types for the stablepay system.

use std::str::FromStr;

/// Storage keys for the different data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Key for storing order records
	Orders,
	/// Key for storing merchant records
	Merchants,
	/// Key for storing emergency withdrawal audit records
	Withdrawals,
	/// Key for storing merchant token balance snapshots
	TokenBalances,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Merchants => "merchants",
			StorageKey::Withdrawals => "withdrawals",
			StorageKey::TokenBalances => "token_balances",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Orders,
			Self::Merchants,
			Self::Withdrawals,
			Self::TokenBalances,
		]
		.into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"merchants" => Ok(Self::Merchants),
			"withdrawals" => Ok(Self::Withdrawals),
			"token_balances" => Ok(Self::TokenBalances),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
