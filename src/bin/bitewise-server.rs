// ABOUTME: BiteWise HTTP server binary: loads configuration, builds resources, serves the API
// ABOUTME: Command-line flags override the port and cache directory from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # BiteWise Server Binary
//!
//! Serves food search, macro lookup, meal analysis, and chat over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bitewise::{config::ServerConfig, logging, resources::ServerResources, routes};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bitewise-server")]
#[command(about = "BiteWise - nutrition resolution and meal analysis API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the USDA cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::load()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(cache_dir) = args.cache_dir {
        config.cache.directory = cache_dir;
    }
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::initialize(&config).await?);
    let app = routes::build_router(resources);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("BiteWise server listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("BiteWise server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
