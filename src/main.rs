mod config;
mod diary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use diary_core::{DiaryWriter, StaticSource};
use diary_provider_google::{Credentials, GoogleCalendarSource, auth};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "gcal2diary")]
#[command(about = "Print Google Calendar events as plain-text diary entries")]
pub struct Cli {
    /// Path to the OAuth client credentials file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Path to the oauth token to use
    #[arg(long)]
    pub token: Option<PathBuf>,

    /// Print debug information to stderr
    #[arg(long)]
    pub debug: bool,

    /// Date style to use (iso, us, eu)
    #[arg(long)]
    pub date_style: Option<String>,

    /// Calendar to read (defaults to "primary")
    #[arg(short, long)]
    pub calendar: Option<String>,

    /// List events from this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// List events until this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Days before and after today to list when --from/--to are not given
    #[arg(long)]
    pub days: Option<i64>,

    /// Time zone the calendar should report event times in (e.g. "Europe/Helsinki")
    #[arg(long)]
    pub time_zone: Option<String>,

    /// Read events from a JSON file instead of Google Calendar
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Path to the config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug)?;

    let file_config = config::load_file_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, file_config, Utc::now())?;
    debug!(?settings, "Resolved settings");

    let stdout = std::io::stdout();
    let mut writer = DiaryWriter::new(stdout.lock(), settings.date_style);

    let stats = match &settings.input {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read events from {}", path.display()))?;
            let mut source = StaticSource::from_json(&json)?;
            diary::write_events(&mut source, &mut writer).await?
        }
        None => {
            let creds = Credentials::load(&settings.credentials)?;
            let http = reqwest::Client::new();
            let token = auth::obtain_token(&http, &creds, &settings.token).await?;

            let mut source = GoogleCalendarSource::new(
                http,
                token,
                settings.calendar.clone(),
                settings.window,
                settings.time_zone.clone(),
            );
            diary::write_events(&mut source, &mut writer).await?
        }
    };

    debug!(written = stats.written, skipped = stats.skipped, "Done");

    Ok(())
}

/// Log to stderr, keeping stdout for the diary itself. `--debug` turns on
/// debug output for our own crates and takes precedence over RUST_LOG.
fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("warn,gcal2diary=debug,diary_core=debug,diary_provider_google=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))
}
