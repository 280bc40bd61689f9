//! # bookwell server
//!
//! Booking API: job listing and lookup, create/update, caller history, the
//! distance feed, and translator push/SMS resend requests.

use std::path::PathBuf;

use anyhow::Context;
use bookwell_config::{Config, ConfigLoad, ConfigLoader};
use bookwell_server::{
    cors_layer, create_app,
    infra::startup::{self, StorageMode},
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bookwell-server")]
#[command(about = "Booking API for jobs, distance feeds and translator notifications")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a bookwell.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Run against a process-local store instead of PostgreSQL
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Tokens for --in-memory runs, as `token:user_id:user_type,...`
    #[arg(long, env = "BOOKWELL_DEV_TOKENS")]
    dev_tokens: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config, cli.serve).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(message = %warning.message, hint = %hint, "configuration warning"),
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let db = startup::connect_postgres(config).await?;
    db.migrate().await.context("failed to apply migrations")?;
    info!("Database migrations applied");
    Ok(())
}

async fn run_server(config: Config, args: ServeArgs) -> anyhow::Result<()> {
    let storage = if args.in_memory {
        let tokens = match args.dev_tokens.as_deref() {
            Some(raw) => startup::parse_dev_tokens(raw)?,
            None => Vec::new(),
        };
        if tokens.is_empty() {
            warn!("--in-memory without BOOKWELL_DEV_TOKENS; every request will be rejected");
        }
        StorageMode::InMemory { tokens }
    } else {
        StorageMode::Postgres
    };

    let state = startup::build_state(&config, storage).await?;
    let app = create_app(state, cors_layer(&config.cors.allowed_origins));

    let addr = config
        .server
        .bind_address()
        .with_context(|| format!("invalid bind address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "bookwell server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("bookwell server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
