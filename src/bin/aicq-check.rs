// Copyright (c) 2025 - Cowboy AI, Inc.
//! Controller Connectivity Check
//!
//! Loads the plugin configuration, verifies the default transport zone of
//! the active controller connection, and optionally lists a tenant's
//! networks.
//!
//! Run with: cargo run --bin aicq-check
//!
//! Environment:
//! 1. AICQ_CONFIG: path to the INI file (default: nvp.ini)
//! 2. AICQ_TENANT: tenant whose networks are printed as JSON (optional)

use aicq::{NvpPlugin, QuantumPluginBase};
use anyhow::{Context, Result};
use tracing::info;

/// Configuration for the check
#[derive(Debug, Clone)]
struct CheckConfig {
    /// INI file holding the NVP section
    config_path: String,
    /// Tenant to list networks for
    tenant: Option<String>,
}

impl CheckConfig {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let config_path =
            std::env::var("AICQ_CONFIG").unwrap_or_else(|_| "nvp.ini".to_string());
        let tenant = std::env::var("AICQ_TENANT").ok().filter(|t| !t.is_empty());

        Self {
            config_path,
            tenant,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = CheckConfig::from_env();
    info!("Loading plugin configuration from {}", config.config_path);

    let plugin = NvpPlugin::from_config_file(&config.config_path)
        .with_context(|| format!("Failed to load {}", config.config_path))?;

    plugin
        .check_default_transport_zone()
        .await
        .context("Default transport zone check failed")?;
    info!("Controller reachable, default transport zone present");

    if let Some(tenant) = &config.tenant {
        let networks = plugin
            .get_all_networks(tenant)
            .await
            .with_context(|| format!("Failed to list networks for tenant {}", tenant))?;
        info!("Tenant {} owns {} network(s)", tenant, networks.len());

        let rendered =
            serde_json::to_string_pretty(&networks).context("Failed to render networks")?;
        println!("{}", rendered);
    }

    Ok(())
}
