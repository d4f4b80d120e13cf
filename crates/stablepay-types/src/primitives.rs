//! Identifier primitives with canonical hex encoding.
//!
//! Domain identifiers (32-byte order/merchant ids, transaction hashes,
//! account addresses) are accepted with or without a `0x` prefix and are
//! always emitted as `0x`-prefixed lowercase hex.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing identifier strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	/// The value is not valid hex or has the wrong length.
	#[error("must be a 32-byte hex string")]
	InvalidBytes32,
	/// The value is not a valid transaction hash.
	#[error("must be a 0x-prefixed 32-byte transaction hash")]
	InvalidTransactionHash,
	/// The value is not a valid 20-byte account address.
	#[error("must be a 20-byte hex address")]
	InvalidAddress,
}

fn decode_fixed<const N: usize>(value: &str) -> Option<[u8; N]> {
	let bare = crate::utils::without_0x_prefix(value);
	if bare.len() != N * 2 {
		return None;
	}
	let mut out = [0u8; N];
	hex::decode_to_slice(bare, &mut out).ok()?;
	Some(out)
}

/// A 32-byte domain identifier (order id, merchant id).
///
/// Parsing accepts bare or `0x`-prefixed hex; the canonical form emitted by
/// [`fmt::Display`] and serde is always `0x`-prefixed lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes32Id(pub B256);

impl Bytes32Id {
	/// Returns the raw fixed bytes.
	pub fn as_b256(&self) -> &B256 {
		&self.0
	}

	/// Returns the canonical `0x`-prefixed lowercase hex form.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.0))
	}
}

impl From<B256> for Bytes32Id {
	fn from(value: B256) -> Self {
		Self(value)
	}
}

impl FromStr for Bytes32Id {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		decode_fixed::<32>(s)
			.map(|bytes| Self(B256::from(bytes)))
			.ok_or(ParseError::InvalidBytes32)
	}
}

impl fmt::Display for Bytes32Id {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

impl Serialize for Bytes32Id {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Bytes32Id {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// A transaction hash (32 bytes, canonical 66-character `0x` hex form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub B256);

impl TransactionHash {
	/// Returns the canonical `0x`-prefixed lowercase hex form.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(self.0))
	}
}

impl From<B256> for TransactionHash {
	fn from(value: B256) -> Self {
		Self(value)
	}
}

impl FromStr for TransactionHash {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		decode_fixed::<32>(s)
			.map(|bytes| Self(B256::from(bytes)))
			.ok_or(ParseError::InvalidTransactionHash)
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

impl Serialize for TransactionHash {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for TransactionHash {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

/// Parses a 20-byte account address, accepting bare or prefixed hex.
pub fn parse_address(value: &str) -> Result<Address, ParseError> {
	decode_fixed::<20>(value)
		.map(Address::from)
		.ok_or(ParseError::InvalidAddress)
}

/// Formats an address in the canonical `0x`-prefixed lowercase hex form.
///
/// The EIP-55 checksummed form is deliberately not used; stored and emitted
/// addresses are always lowercase so string equality works as a lookup key.
pub fn format_address(address: &Address) -> String {
	format!("0x{}", hex::encode(address))
}
