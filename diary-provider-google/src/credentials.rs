//! OAuth client credentials as downloaded from the Google Cloud console.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The console wraps the client under `installed` or `web` depending on
/// the application type.
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<Credentials>,
    web: Option<Credentials>,
}

impl Credentials {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialsFile =
            serde_json::from_str(json).context("Credentials are not valid JSON")?;

        file.installed
            .or(file.web)
            .context("Credentials contain neither an \"installed\" nor a \"web\" client")
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found at {}.\n\n\
                Create an OAuth client of type \"Desktop app\" at\n\
                https://console.cloud.google.com/apis/credentials\n\
                and download its JSON to that path.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file ({})", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse credentials file ({})", path.display()))
    }
}
