//! Settings from the optional config file and the command line.
//!
//! The config file lives at ~/.config/gcal2diary/config.toml; every key is
//! optional and command-line flags take precedence:
//!
//! ```toml
//! date_style = "eu"
//! calendar = "primary"
//! days = 14
//! time_zone = "Europe/Helsinki"
//! credentials = "~/.config/gcal2diary/credentials.json"
//! token = "~/.config/gcal2diary/token.json"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use diary_core::window::DEFAULT_WINDOW_DAYS;
use diary_core::{DateStyle, TimeWindow};
use serde::Deserialize;

use crate::Cli;

const DEFAULT_CALENDAR: &str = "primary";
const DEFAULT_CREDENTIALS: &str = "./credentials.json";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub date_style: Option<String>,
    pub credentials: Option<String>,
    pub token: Option<String>,
    pub calendar: Option<String>,
    pub days: Option<i64>,
    pub time_zone: Option<String>,
}

/// Everything a run needs, validated once before any event is read.
#[derive(Debug)]
pub struct Settings {
    pub date_style: DateStyle,
    pub credentials: PathBuf,
    pub token: PathBuf,
    pub calendar: String,
    pub window: TimeWindow,
    pub time_zone: Option<String>,
    pub input: Option<PathBuf>,
}

/// Get the config directory path (~/.config/gcal2diary)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcal2diary"))
}

/// Token path used when neither flag nor config file sets one
pub fn default_token_path() -> PathBuf {
    match config_dir() {
        Some(dir) => dir.join("token.json"),
        None => PathBuf::from("./token.json"),
    }
}

/// Load the config file. An explicitly given file must exist; the default
/// one is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_dir() {
            Some(dir) => dir.join("config.toml"),
            None => return Ok(FileConfig::default()),
        },
    };

    if explicit.is_none() && !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))
}

impl Settings {
    pub fn resolve(cli: &Cli, file: FileConfig, now: DateTime<Utc>) -> Result<Self> {
        let date_style: DateStyle = cli
            .date_style
            .as_deref()
            .or(file.date_style.as_deref())
            .unwrap_or("iso")
            .parse()?;

        let credentials = cli
            .credentials
            .clone()
            .or_else(|| file.credentials.as_deref().map(expand_path))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS));

        let token = cli
            .token
            .clone()
            .or_else(|| file.token.as_deref().map(expand_path))
            .unwrap_or_else(default_token_path);

        let calendar = cli
            .calendar
            .clone()
            .or(file.calendar)
            .unwrap_or_else(|| DEFAULT_CALENDAR.to_string());

        let days = cli.days.or(file.days).unwrap_or(DEFAULT_WINDOW_DAYS);
        let window = TimeWindow::from_args(now, cli.from.as_deref(), cli.to.as_deref(), days)?;

        let time_zone = cli.time_zone.clone().or(file.time_zone);
        if let Some(tz) = &time_zone {
            tz.parse::<chrono_tz::Tz>()
                .map_err(|_| anyhow::anyhow!("Unknown time zone '{}'", tz))?;
        }

        Ok(Settings {
            date_style,
            credentials,
            token,
            calendar,
            window,
            time_zone,
            input: cli.input.clone(),
        })
    }
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
