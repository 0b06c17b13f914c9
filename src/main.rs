use anyhow::Result;
use clap::{Parser, Subcommand};
use ftth_planner::config::AppConfig;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ftth-planner")]
#[command(about = "FTTH route planning backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Web {
        /// Interface to bind to
        #[arg(long, default_value = "0.0.0.0")]
        interface: String,
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },
    /// Apply pending database migrations
    Migrate,
    /// Resample a GeoJSON LineString file and print the samples as JSON
    Resample {
        /// GeoJSON file holding a LineString geometry or Feature
        #[arg(long)]
        file: PathBuf,
        /// Distance between samples in meters
        #[arg(long, default_value_t = 20.0)]
        step_m: f64,
    },
}

fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;
    let dsn = match dsn.parse::<sentry::types::Dsn>() {
        Ok(dsn) => dsn,
        Err(e) => {
            eprintln!("Ignoring invalid SENTRY_DSN: {}", e);
            return None;
        }
    };

    Some(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        attach_stacktrace: true,
        ..Default::default()
    }))
}

fn init_tracing(sentry_enabled: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let sentry_layer = sentry_enabled.then(sentry_tracing::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let sentry_guard = init_sentry(&config);
    init_tracing(sentry_guard.is_some());
    if config.sentry_dsn.is_some() && sentry_guard.is_none() {
        warn!("Sentry reporting is disabled");
    }

    match cli.command {
        Commands::Web { interface, port } => commands::handle_web(config, interface, port).await,
        Commands::Migrate => commands::handle_migrate(&config).await,
        Commands::Resample { file, step_m } => commands::handle_resample(&file, step_m).await,
    }
}
