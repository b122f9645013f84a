use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Credential file looked up in the working directory.
pub const TOKENS_FILE: &str = ".tokens.yaml";

/// Endpoint used when the credential file has no `api_url`.
pub const DEFAULT_API_URL: &str = "https://api.githubcopilot.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read tokens file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse tokens file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_saphyr::Error,
    },
    #[error("Tokens file '{}' does not contain a copilot_token.", path.display())]
    MissingToken { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
struct TokensFile {
    api_url: Option<String>,
    copilot_token: Option<String>,
}

/// Access token and base URL for the chat-completion endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub api_url: String,
    pub copilot_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("copilot_token", &"<redacted>")
            .finish()
    }
}

/// Reads and parses the credential file at `path`.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty document is an empty mapping, not a parse failure.
    let file: TokensFile = if raw.trim().is_empty() {
        TokensFile::default()
    } else {
        serde_saphyr::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };

    let copilot_token = file
        .copilot_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingToken {
            path: path.to_path_buf(),
        })?;

    let api_url = file
        .api_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    debug!(path = %path.display(), api_url = %api_url, token_present = true, "loaded credentials");

    Ok(Credentials {
        api_url,
        copilot_token,
    })
}
