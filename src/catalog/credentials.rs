//! Where the TMDB API key comes from.
//!
//! The key is looked up again on every request rather than cached at startup,
//! so a user who fixes `.env.local` only has to retry, not restart.

use std::path::{Path, PathBuf};

/// Value written by the setup command; treated the same as an absent key.
pub const PLACEHOLDER_API_KEY: &str = "your_tmdb_api_key_here";

/// Supplies the API key for a single request.
pub trait CredentialSource: Send + Sync {
    /// Returns the key if one is configured and usable.
    fn api_key(&self) -> Option<String>;
}

/// True when `value` can be sent upstream.
pub fn is_usable_key(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != PLACEHOLDER_API_KEY
}

/// Reads the key from the process environment, then from an env file.
#[derive(Debug, Clone)]
pub struct EnvFileCredentials {
    env_file: PathBuf,
    var: String,
}

impl EnvFileCredentials {
    pub fn new(env_file: impl Into<PathBuf>, var: impl Into<String>) -> Self {
        Self {
            env_file: env_file.into(),
            var: var.into(),
        }
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }
}

impl CredentialSource for EnvFileCredentials {
    fn api_key(&self) -> Option<String> {
        if let Ok(value) = std::env::var(&self.var) {
            if is_usable_key(&value) {
                return Some(value.trim().to_string());
            }
        }

        match read_env_value(&self.env_file, &self.var) {
            Ok(Some(value)) if is_usable_key(&value) => Some(value.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = ?self.env_file, error = %e, "Failed to read env file");
                None
            }
        }
    }
}

/// Fixed key, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.as_deref().filter(|k| is_usable_key(k)).map(str::to_string)
    }
}

/// Look up `key` in a dotenv-style file. A missing file yields `Ok(None)`.
pub fn read_env_value(path: &Path, key: &str) -> Result<Option<String>, dotenvy::Error> {
    if !path.exists() {
        return Ok(None);
    }

    for entry in dotenvy::from_path_iter(path)? {
        let (k, v) = entry?;
        if k == key {
            return Ok(Some(v));
        }
    }

    Ok(None)
}
