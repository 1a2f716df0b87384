//! MyQ bridge gateway binary.
//!
//! # Environment
//!
//! - `MYQ_USERNAME`, `MYQ_PASSWORD`: MyQ account credentials (required)
//! - `MYQ_BASE_URL`: override the MyQ API endpoint
//! - `LISTEN_ADDR`: listen address, default `0.0.0.0:8080`
//! - `RUST_LOG`: tracing filter

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myq_bridge_client::{Credentials, HttpMyqClient, MyqConfig};
use myq_bridge_gateway::{create_router, GatewayConfig, GatewayState};
use myq_bridge_skill::SkillService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,myq_bridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MyQ Bridge Gateway");

    // Load configuration from environment
    let username = required_env("MYQ_USERNAME")?;
    let password = required_env("MYQ_PASSWORD")?;
    let base_url = std::env::var("MYQ_BASE_URL").ok();
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let myq_config = match base_url {
        Some(url) => MyqConfig::default().with_base_url(url),
        None => MyqConfig::default(),
    };

    tracing::info!(
        listen_addr = %listen_addr,
        myq_base_url = %myq_config.base_url,
        username = %username,
        "Gateway configuration loaded"
    );

    let client = Arc::new(HttpMyqClient::new(myq_config)?);
    let skill = Arc::new(SkillService::with_defaults(
        client,
        Credentials::new(username, password),
    ));

    let gateway_config = GatewayConfig::default().with_listen_addr(listen_addr);
    let listen_addr = gateway_config.listen_addr.clone();
    let app = create_router(GatewayState::new(skill, gateway_config));

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn required_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{name} must be set").into())
}
