use clap::Parser;
use deeplx::config::{DEFAULT_UPSTREAM_URL, GatewayConfig, TokenAllowList};
use deeplx::TranslationGateway;
use deeplx_web::{AppState, router};
use std::time::Duration;
use tracing::{error, info, warn};

/// DeepLX HTTP gateway
#[derive(Debug, Parser)]
#[command(name = "deeplx-web", version, about)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Outbound proxy for upstream requests
    #[arg(long, env = "PROXY")]
    proxy: Option<String>,

    /// Comma-separated list of accepted tokens
    #[arg(long, env = "TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Per-call upstream timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    /// Upstream JSON-RPC endpoint
    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    upstream_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = GatewayConfig::new()
        .with_upstream_url(args.upstream_url)
        .with_proxy(args.proxy)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_tokens(TokenAllowList::parse(&args.token));

    let gateway = TranslationGateway::from_config(&config)
        .map_err(|e| format!("Failed to initialize gateway: {}", e))?;

    if config.tokens.contains("") {
        warn!("No TOKEN configured; /translate accepts requests without a token");
    }
    if let Some(proxy) = &config.proxy {
        info!("Routing upstream traffic through {}", proxy);
    }

    info!("🚀 Starting DeepLX gateway");
    let app = router(AppState::new(gateway, config.tokens.clone()));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
