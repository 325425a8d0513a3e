//! CLI Command Handlers
//!
//! Each handler builds what it needs from config, runs, and returns an
//! ExitCode.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::debug;

use crate::api::RezkaClient;
use crate::cli::{ExitCode, Output, ResolveCmd, ServeCmd, TranslatorsCmd};
use crate::config::Config;
use crate::models::ResolveRequest;
use crate::resolver::{Resolver, SessionGate};
use crate::server;

/// Build the production resolver from config
pub fn build_resolver(config: &Config) -> Result<Resolver<RezkaClient>> {
    let client = RezkaClient::new(config).context("Failed to build HTTP client")?;
    debug!(host = client.base_url(), "catalog client ready");
    Ok(Resolver::new(client, SessionGate::from_config(config)))
}

// =============================================================================
// Serve Command
// =============================================================================

pub async fn serve_cmd(cmd: ServeCmd, config: Config) -> Result<()> {
    let bind = cmd.bind.unwrap_or_else(|| config.bind.clone());
    let resolver = Arc::new(build_resolver(&config)?);

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    server::serve(listener, server::router(resolver)).await
}

// =============================================================================
// One-shot Commands
// =============================================================================

pub async fn resolve_cmd(cmd: ResolveCmd, config: &Config, output: &Output) -> ExitCode {
    if cmd.query.trim().is_empty() {
        return output.error("Query must not be empty", ExitCode::InvalidArgs);
    }

    let resolver = match build_resolver(config) {
        Ok(r) => r,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Startup),
    };

    let response = resolver.resolve_media(&ResolveRequest::from(cmd)).await;
    if let Err(e) = output.print(&response) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Failed);
    }

    if response.is_failure() {
        ExitCode::Failed
    } else {
        ExitCode::Success
    }
}

pub async fn translators_cmd(cmd: TranslatorsCmd, config: &Config, output: &Output) -> ExitCode {
    if cmd.query.trim().is_empty() {
        return output.error("Query must not be empty", ExitCode::InvalidArgs);
    }

    let resolver = match build_resolver(config) {
        Ok(r) => r,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Startup),
    };

    let response = resolver.list_translators(&cmd.query).await;
    if let Err(e) = output.print(&response) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Failed);
    }

    if response.error.is_some() {
        ExitCode::Failed
    } else {
        ExitCode::Success
    }
}
