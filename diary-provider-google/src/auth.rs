//! OAuth flow for a read-only Google Calendar session.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::Credentials;
use crate::token::Token;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar.readonly"];

const REDIRECT_PORT: u16 = 8085;
const STATE: &str = "gcal2diary";

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

pub fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Return a usable token: the stored one, refreshed if it expired, or a new
/// one from the browser consent flow.
pub async fn obtain_token(
    http: &reqwest::Client,
    creds: &Credentials,
    token_path: &Path,
) -> Result<Token> {
    match Token::load(token_path) {
        Ok(token) if !token.is_expired() => return Ok(token),
        Ok(token) => {
            debug!("Stored access token expired, refreshing");
            match refresh(http, creds, &token).await {
                Ok(fresh) => {
                    store(&fresh, token_path);
                    return Ok(fresh);
                }
                Err(e) => debug!("Could not refresh auth token: {:#}", e),
            }
        }
        Err(e) => debug!("Could not reuse existing auth token: {:#}", e),
    }

    let token = authorize_in_browser(http, creds).await.context("Failed to auth")?;
    store(&token, token_path);
    Ok(token)
}

fn store(token: &Token, path: &Path) {
    debug!("Saving auth token to {}", path.display());
    if let Err(e) = token.save(path) {
        warn!("Failed to save auth token for reuse: {:#}", e);
    }
}

/// Build the consent page URL the user has to visit.
pub fn consent_url(creds: &Credentials) -> Result<Url> {
    let scope = SCOPES.join(" ");
    let redirect = redirect_uri();

    Url::parse_with_params(
        &creds.auth_uri,
        &[
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", redirect.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", STATE),
        ],
    )
    .with_context(|| format!("Invalid auth_uri in credentials: {}", creds.auth_uri))
}

async fn authorize_in_browser(http: &reqwest::Client, creds: &Credentials) -> Result<Token> {
    let listener = TcpListener::bind(redirect_address())
        .await
        .context("Failed to bind OAuth callback listener")?;

    let auth_url = consent_url(creds)?;

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("  {}\n", auth_url);

    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let code = wait_for_callback(&listener).await?;

    eprintln!("Received authorization code, exchanging for tokens...");

    exchange_code(http, creds, &code).await
}

async fn wait_for_callback(listener: &TcpListener) -> Result<String> {
    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let code = parse_callback(&request_line);

    let body = match &code {
        Ok(_) => "<h1>Authentication successful!</h1>\
            <p>You can close this window and return to the terminal.</p>",
        Err(_) => "<h1>Authentication failed.</h1>\
            <p>Check the terminal for details.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>{}</body></html>",
        body
    );

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    code
}

/// Pull the authorization code out of the callback's HTTP request line.
fn parse_callback(request_line: &str) -> Result<String> {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = Url::parse(&format!("http://localhost{}", path))?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = param("error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    if param("state").as_deref() != Some(STATE) {
        anyhow::bail!("OAuth callback state does not match");
    }

    param("code").ok_or_else(|| anyhow::anyhow!("No code in callback"))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<String>) -> Token {
        Token {
            access_token: self.access_token,
            // Google typically doesn't return a new refresh_token on refresh
            refresh_token: self.refresh_token.or(previous_refresh),
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

async fn exchange_code(http: &reqwest::Client, creds: &Credentials, code: &str) -> Result<Token> {
    let redirect = redirect_uri();
    let params = [
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("code", code),
        ("redirect_uri", redirect.as_str()),
        ("grant_type", "authorization_code"),
    ];

    let response = request_token(http, creds, &params)
        .await
        .context("Failed to retrieve auth token")?;
    Ok(response.into_token(None))
}

pub async fn refresh(http: &reqwest::Client, creds: &Credentials, token: &Token) -> Result<Token> {
    let refresh_token = token
        .refresh_token
        .as_deref()
        .context("Stored token has no refresh token")?;

    let params = [
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];

    let response = request_token(http, creds, &params)
        .await
        .context("Failed to refresh token")?;
    Ok(response.into_token(token.refresh_token.clone()))
}

async fn request_token(
    http: &reqwest::Client,
    creds: &Credentials,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = http
        .post(&creds.token_uri)
        .form(params)
        .send()
        .await
        .with_context(|| format!("Failed to reach token endpoint {}", creds.token_uri))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token endpoint returned HTTP {}: {}", status, error_text);
    }

    response
        .json()
        .await
        .context("Failed to parse token endpoint response")
}
