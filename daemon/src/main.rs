//! ZID daemon — entry point for running the verification service.

mod config;
mod shutdown;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use config::ServiceConfig;
use shutdown::ShutdownController;
use zid_anchor::{AnchorWorker, HttpLedger};
use zid_notify::HttpMailer;
use zid_rpc::{AppState, RpcServer};
use zid_store_memory::MemoryStore;
use zid_utils::LogFormat;

#[derive(Parser)]
#[command(name = "zid-daemon", about = "ZID employment-verification service")]
struct Cli {
    /// Address the HTTP API binds to.
    #[arg(long, env = "ZID_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Public base URL used in verification links.
    #[arg(long, env = "ZID_PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Mail webhook URL for dispatching verifier emails.
    #[arg(long, env = "ZID_MAIL_WEBHOOK_URL")]
    mail_webhook_url: Option<String>,

    /// Ledger gateway URL for on-chain confirmations.
    #[arg(long, env = "ZID_LEDGER_GATEWAY_URL")]
    ledger_gateway_url: Option<String>,

    /// Verification token lifetime in days.
    #[arg(long, env = "ZID_TOKEN_TTL_DAYS")]
    token_ttl_days: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ZID_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ZID_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the HTTP API and the anchor worker.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => match ServiceConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!(
                    "failed to load config file {}: {e}; using defaults",
                    path.display()
                );
                ServiceConfig::default()
            }
        },
        None => ServiceConfig::default(),
    };

    if let Some(v) = cli.bind_addr {
        config.bind_addr = v;
    }
    if let Some(v) = cli.public_base_url {
        config.public_base_url = v;
    }
    if let Some(v) = cli.mail_webhook_url {
        config.mail_webhook_url = v;
    }
    if let Some(v) = cli.ledger_gateway_url {
        config.ledger_gateway_url = v;
    }
    if let Some(days) = cli.token_ttl_days {
        config.workflow.token_ttl_secs = days * 86_400;
    }
    if let Some(v) = cli.log_level {
        config.log_level = v;
    }
    if let Some(v) = cli.log_format {
        config.log_format = v;
    }

    zid_utils::init_tracing(&config.log_level, LogFormat::parse(&config.log_format));

    match cli.command {
        Command::Serve => serve(config).await,
    }
}

async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        !config.mail_webhook_url.is_empty(),
        "mail webhook URL is required (--mail-webhook-url or ZID_MAIL_WEBHOOK_URL)"
    );
    anyhow::ensure!(
        !config.ledger_gateway_url.is_empty(),
        "ledger gateway URL is required (--ledger-gateway-url or ZID_LEDGER_GATEWAY_URL)"
    );

    let bind_addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind_addr))?;

    tracing::info!(
        bind = %bind_addr,
        base_url = %config.public_base_url,
        token_ttl = %zid_utils::format_duration(config.workflow.token_ttl_secs),
        "starting ZID verification service"
    );

    let store = Arc::new(MemoryStore::new());
    let mailer = HttpMailer::new(config.mail_webhook_url.clone());
    let ledger = HttpLedger::new(config.ledger_gateway_url.clone());

    let state = Arc::new(AppState::new(
        Arc::clone(&store),
        mailer,
        config.workflow.clone(),
        config.public_base_url.clone(),
    ));

    let worker = AnchorWorker::new(
        Arc::clone(&store),
        ledger,
        config.workflow.clone(),
        Duration::from_secs(config.worker_tick_secs),
    );

    let controller = ShutdownController::new();
    let worker_rx = controller.subscribe();
    let server_rx = controller.subscribe();
    tokio::spawn(controller.wait_for_signal());

    let worker_handle = tokio::spawn(worker.run(worker_rx));

    RpcServer::new(bind_addr).serve(state, server_rx).await?;

    worker_handle.await.context("anchor worker panicked")?;
    tracing::info!("ZID daemon exited cleanly");
    Ok(())
}
