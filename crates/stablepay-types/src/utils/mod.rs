//! Utility functions shared across the stablepay crates.

/// String formatting utilities for hex values.
pub mod formatting;

pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}
