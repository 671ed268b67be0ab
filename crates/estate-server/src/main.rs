// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Estate provisioning server binary.

use std::path::PathBuf;

use clap::Parser;
use estate_server::{create_app_state, create_router};
use estate_server_config::{LogFormat, ServerConfig};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Estate server - company provisioning over HTTP.
#[derive(Parser, Debug)]
#[command(name = "estate-server", about = "Estate provisioning server", version)]
struct Args {
	/// Config file to read instead of /etc/estate/server.toml.
	#[arg(long, env = "ESTATE_SERVER_CONFIG")]
	config: Option<PathBuf>,
}

fn init_tracing(config: &ServerConfig) {
	let json = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(|| tracing_subscriber::fmt::layer()))
		.init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Load .env file if present
	dotenvy::dotenv().ok();

	let args = Args::parse();

	let config = match &args.config {
		Some(path) => estate_server_config::load_config_with_file(path)?,
		None => estate_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database_backend = %config.database.backend,
		identity_backend = %config.identity.backend,
		"starting estate-server"
	);

	let state = create_app_state(&config).await?;

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "failed to listen for shutdown signal");
			}
			tracing::info!("Received shutdown signal");
		})
		.await?;

	tracing::info!("Server shutdown complete");
	Ok(())
}
