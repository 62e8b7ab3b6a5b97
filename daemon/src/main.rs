//! agora daemon — entry point for running the election backend.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use agora_api::{ApiServer, AppConfig, AppState};
use agora_mailer::MailgunMailer;
use agora_store_lmdb::LmdbStore;

#[derive(Parser)]
#[command(name = "agora-daemon", about = "agora election platform backend")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long, env = "AGORA_PORT")]
    port: Option<u16>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "AGORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info", env = "AGORA_LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    agora_utils::init_tracing_with_default(&cli.log_level);

    let mut config = if let Some(ref config_path) = cli.config {
        let cfg = AppConfig::from_toml_file(config_path)?;
        tracing::info!("Loaded config from {}", config_path.display());
        cfg
    } else {
        AppConfig::default()
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.log_level = cli.log_level;

    let store = Arc::new(LmdbStore::open(&config.data_dir)?);
    let mailer = Arc::new(MailgunMailer::new(
        config.mailgun_endpoint.clone(),
        config.mailgun_api_key.clone(),
    ));
    let state = Arc::new(AppState::new(store, mailer, &config));

    tracing::info!(
        "Starting agora backend (port {}, data dir {})",
        config.port,
        config.data_dir.display()
    );
    let server = ApiServer::new(config.port, state);
    server.start().await?;

    tracing::info!("agora daemon exited cleanly");
    Ok(())
}
