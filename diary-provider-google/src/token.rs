//! OAuth token storage.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this long before Google says they are.
const EXPIRY_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open token file ({})", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file ({})", path.display()))
    }

    /// Write the token as JSON, readable by the owner only.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Only directories created here get their permissions narrowed
        if let Some(parent) = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))
                    .with_context(|| format!("Failed to set permissions on {}", parent.display()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize token")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to save token to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= expiry,
            None => false,
        }
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_token() -> Token {
        Token {
            access_token: "ya29.access".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            token_type: "Bearer".to_string(),
            expiry: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_save_creates_directory_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gcal2diary").join("token.json");

        make_token().save(&path).unwrap();
        assert_eq!(Token::load(&path).unwrap(), make_token());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "Token file should be owner-only");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Token::load(&dir.path().join("token.json")).is_err());
    }

    #[test]
    fn test_load_minimal_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, r#"{"access_token": "abc"}"#).unwrap();

        let token = Token::load(&path).unwrap();
        assert_eq!(token.authorization_header(), "Bearer abc");
        assert!(token.refresh_token.is_none());
        assert!(!token.is_expired(), "Token without expiry never expires");
    }

    #[test]
    fn test_expiry_with_leeway() {
        let token = make_token();
        let expiry = token.expiry.unwrap();

        assert!(!token.is_expired_at(expiry - Duration::minutes(5)));
        assert!(token.is_expired_at(expiry - Duration::seconds(30)));
        assert!(token.is_expired_at(expiry + Duration::minutes(1)));
    }
}
