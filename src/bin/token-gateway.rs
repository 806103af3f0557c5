use std::sync::Arc;

use clap::Parser;
use token_gateway::cache::token_cache::TokenCache;
use token_gateway::provider::keycloak::KeycloakProvider;
use token_gateway::server;
use token_gateway::utils::config_loader;
use token_gateway::utils::constants::DEFAULT_CONFIG_PATH;
use token_gateway::utils::logging;
use token_gateway::Authenticator;
use anyhow::Result;
use token_gateway::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Identity provider client
    // -------------------------------

    let provider = KeycloakProvider::new(&service_config.provider)?;
    info!(token_url = %provider.token_url(), "identity provider configured");

    // -------------------------------
    // 3. Token cache + authenticator
    // -------------------------------

    let gateway = Authenticator::new(provider, TokenCache::new())
        .with_single_flight(service_config.cache.single_flight);

    // -------------------------------
    // 4. Start http server
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config.settings, Arc::new(gateway)).await
}
