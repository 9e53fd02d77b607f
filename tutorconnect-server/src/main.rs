use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};
use tutorconnect_core::TutorConnectConfig;

use tutorconnect_server::server;
use tutorconnect_server::state::AppState;
use tutorconnect_server::subsystems::{billing, presence};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "tutorconnect.toml")]
    config: String,

    /// Validate the configuration, print a summary and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match TutorConnectConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging
    let directive: Directive = config
        .service
        .log_level
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into());
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    if args.check_config {
        println!("✅ Config OK ({})", args.config);
        println!("   IPC socket:  {}", config.service.socket_path);
        println!(
            "   HTTP:        {} ({}:{})",
            if config.http.enabled { "enabled" } else { "disabled" },
            config.http.host,
            config.http.port
        );
        println!(
            "   Presence:    every {}s, p={}",
            config.presence.tick_seconds, config.presence.flip_probability
        );
        println!("   Billing:     every {}s", config.billing.tick_seconds);
        println!(
            "   Wallet:      start {}{:.2}, top-up {}{:.2}",
            config.billing.currency_symbol,
            config.wallet.initial_balance,
            config.billing.currency_symbol,
            config.wallet.top_up_amount
        );
        return Ok(());
    }

    let (state, billing_tx) = AppState::new(config.clone());

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    // Presence simulator
    tokio::spawn(presence::run_presence_loop(
        state.marketplace.clone(),
        config.presence.clone(),
        tx.subscribe(),
    ));

    // Billing ticker
    tokio::spawn(billing::run_billing_loop(
        state.marketplace.clone(),
        config.billing.clone(),
        billing_tx,
        tx.subscribe(),
    ));

    // HTTP API
    if config.http.enabled {
        let http_state = state.clone();
        let http_shutdown = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) = tutorconnect_server::http::start_http_server(http_state, http_shutdown).await {
                tracing::error!("HTTP server error: {}", e);
            }
        });
    }

    let socket_path = config.service.socket_path.clone();
    server::run_unix_server(&socket_path, state, tx.subscribe()).await?;

    Ok(())
}
