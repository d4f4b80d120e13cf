//! HTTP server for the stablepay API.
//!
//! Pure plumbing: maps routes to staging-protocol invocations. All
//! request validation and state transitions happen inside the core; the
//! handlers translate between JSON payloads and core calls.

use axum::{
	routing::{get, post},
	Router,
};
use stablepay_config::ApiConfig;
use stablepay_core::StagingService;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::apis::{merchant, order, platform};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the staging service for processing requests.
	pub staging: Arc<StagingService>,
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	staging: Arc<StagingService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState { staging };

	let orders = Router::new()
		.route("/prepare-create", post(order::prepare_create))
		.route("/confirm-create", post(order::confirm_create))
		.route("/prepare-pay", post(order::prepare_pay))
		.route("/confirm-pay", post(order::confirm_pay))
		.route("/prepare-cancel", post(order::prepare_cancel))
		.route("/confirm-cancel", post(order::confirm_cancel))
		.route("/{order_id}", get(order::get_order));

	let merchants = Router::new()
		.route("/register", post(merchant::register))
		.route(
			"/{merchant_id}",
			get(merchant::get_merchant).delete(merchant::delete_merchant),
		)
		.route("/{merchant_id}/verified", get(merchant::is_verified))
		.route("/{merchant_id}/balance", post(merchant::balance))
		.route("/prepare-update/{merchant_id}", post(merchant::prepare_update))
		.route("/confirm-update/{merchant_id}", post(merchant::confirm_update))
		.route("/prepare-refund/{order_id}", post(merchant::prepare_refund))
		.route("/confirm-refund/{order_id}", post(merchant::confirm_refund));

	let platform_routes = Router::new()
		.route("/approve-token", post(platform::prepare_approve))
		.route("/confirm-approve", post(platform::confirm_approve))
		.route("/prepare-settle", post(platform::prepare_settle))
		.route("/confirm-settle", post(platform::confirm_settle))
		.route("/prepare-refund", post(platform::prepare_refund))
		.route("/confirm-refund", post(platform::confirm_refund))
		.route("/emergency-withdrawal", post(platform::emergency_withdraw))
		.route(
			"/enable-emergency-withdrawal",
			post(platform::set_withdrawal_enabled),
		)
		.route("/set-token-support", post(platform::set_token_support))
		.route(
			"/merchant-verification-status",
			post(platform::update_verification_status),
		)
		.route(
			"/update-merchant-registry",
			post(platform::update_merchant_registry),
		)
		.route("/token-balance", post(platform::platform_balance))
		.route("/contract-token-balance", post(platform::contract_balance));

	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.nest("/orders", orders)
				.nest("/merchants", merchants)
				.nest("/platform", platform_routes),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("stablepay API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}
