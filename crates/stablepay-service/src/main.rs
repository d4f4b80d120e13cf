//! Main entry point for the stablepay service.
//!
//! This binary wires the payment orchestration backend together: it loads
//! configuration, constructs the storage backend and chain client, builds
//! the staging service, and serves the HTTP API until interrupted.

use clap::Parser;
use stablepay_chain::implementations::evm::alloy::AlloyChain;
use stablepay_chain::ChainInterface;
use stablepay_config::Config;
use stablepay_core::StagingService;
use stablepay_storage::implementations::{file::FileStorage, memory::MemoryStorage};
use stablepay_storage::{StorageInterface, StorageService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod apis;
mod server;

/// Command-line arguments for the stablepay service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the staging service with its collaborators
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config = Config::from_file(
		args.config
			.to_str()
			.ok_or("Configuration path is not valid UTF-8")?,
	)
	.await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let storage = Arc::new(build_storage(&config));
	let chain = build_chain(&config)?;
	let network = config.active_network().clone();
	tracing::info!(
		chain_id = config.chain.active,
		network = %network.name,
		"Connected chain client"
	);

	let staging = Arc::new(StagingService::new(chain, Arc::clone(&storage), network));

	spawn_storage_cleanup(
		Arc::clone(&storage),
		Duration::from_secs(config.storage.cleanup_interval_seconds),
	);

	server::start_server(config.api.clone(), staging).await?;

	tracing::info!("Stopped stablepay service");
	Ok(())
}

/// Constructs the configured storage backend.
fn build_storage(config: &Config) -> StorageService {
	let backend: Box<dyn StorageInterface> = match config.storage.backend.as_str() {
		"file" => Box::new(FileStorage::new(PathBuf::from(&config.storage.path))),
		// Config validation restricts the backend to "memory" or "file".
		_ => Box::new(MemoryStorage::new()),
	};
	StorageService::new(backend)
}

/// Constructs the chain client for the active network.
fn build_chain(config: &Config) -> Result<Arc<dyn ChainInterface>, Box<dyn std::error::Error>> {
	let network = config.active_network();
	let chain = AlloyChain::connect(
		config.chain.active,
		&network.rpc_url,
		&config.signer.private_key,
		Duration::from_secs(config.chain.receipt_timeout_seconds),
	)?;
	Ok(Arc::new(chain))
}

/// Periodically removes expired entries from storage.
fn spawn_storage_cleanup(storage: Arc<StorageService>, interval: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		// The first tick fires immediately; skip it so startup stays quiet.
		ticker.tick().await;
		loop {
			ticker.tick().await;
			match storage.cleanup_expired().await {
				Ok(0) => {}
				Ok(removed) => {
					tracing::debug!("Removed {} expired storage entries", removed);
				}
				Err(e) => tracing::warn!("Storage cleanup failed: {}", e),
			}
		}
	});
}
