//! Common types module for the stablepay system.
//!
//! This module defines the core data types and structures shared across the
//! payment orchestration backend. It provides a centralized location for
//! domain records, identifiers, and wire formats to ensure consistency
//! across all components.

/// API request and response structures for the HTTP endpoints.
pub mod api;
/// Chain interaction types: transactions, receipts, and log entries.
pub mod chain;
/// Unsigned transaction descriptor returned to clients for signing.
pub mod descriptor;
/// Merchant records and verification status.
pub mod merchant;
/// Network configuration types.
pub mod networks;
/// Order records and lifecycle status.
pub mod order;
/// Identifier primitives with canonical hex encoding.
pub mod primitives;
/// Secure string type for sensitive configuration values.
pub mod secret_string;
/// Storage collection keys.
pub mod storage;
/// Utility functions for formatting and timestamps.
pub mod utils;
/// Emergency withdrawal audit records.
pub mod withdrawal;

// Re-export all types for convenient access
pub use api::*;
pub use chain::*;
pub use descriptor::*;
pub use merchant::*;
pub use networks::{deserialize_networks, NetworkConfig, NetworksConfig};
pub use order::*;
pub use primitives::*;
pub use secret_string::SecretString;
pub use storage::*;
pub use utils::{current_timestamp, truncate_id, with_0x_prefix, without_0x_prefix};
pub use withdrawal::*;
