use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;

use jobtracker::app::{App, AppContext};
use jobtracker::config::{ClientConfig, ConfigError};
use jobtracker::net::api::ApiError;

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to initialise API client: {0}")]
    Api(#[from] ApiError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jobtracker", about = "Track job applications from the terminal")]
struct Cli {
    /// REST API base URL (overrides `JOBTRACKER_API_URL`).
    #[arg(long)]
    api_url: Option<String>,

    /// Real-time endpoint (overrides `JOBTRACKER_WS_URL`).
    #[arg(long)]
    ws_url: Option<String>,

    /// Directory holding the session token (overrides `JOBTRACKER_DATA_DIR`).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Do not open the real-time channel.
    #[arg(long)]
    no_realtime: bool,

    /// Path to open first.
    #[arg(default_value = "/")]
    path: String,
}

impl Cli {
    fn apply(self, mut config: ClientConfig) -> Result<(ClientConfig, String), ConfigError> {
        let overrides = |key: &str| match key {
            "JOBTRACKER_API_URL" => self.api_url.clone(),
            "JOBTRACKER_WS_URL" => self.ws_url.clone(),
            _ => None,
        };
        // Route URL flags through the same validation as the environment.
        let flagged = ClientConfig::from_vars(overrides)?;
        if self.api_url.is_some() {
            config.api_url = flagged.api_url;
        }
        if self.ws_url.is_some() {
            config.ws_url = flagged.ws_url;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = Some(dir);
        }
        if self.no_realtime {
            config.realtime = false;
        }
        Ok((config, self.path))
    }
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let (config, path) = Cli::parse().apply(ClientConfig::from_env()?)?;
    tracing::info!(api_url = %config.api_url, realtime = config.realtime, "starting");

    let mut app = App::new(AppContext::from_config(config)?);
    app.start(&path).await;
    jobtracker::shell::run(&mut app, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    Ok(())
}
