//! First-run setup: make sure the env file holding the TMDB key exists.

use anyhow::{Context, Result};
use std::path::Path;

use crate::catalog::credentials::{is_usable_key, read_env_value, PLACEHOLDER_API_KEY};

pub const API_KEY_URL: &str = "https://www.themoviedb.org/settings/api";

/// Manual steps printed after every setup run.
pub const SETUP_STEPS: [&str; 4] = [
    "Sign up at TMDB: https://www.themoviedb.org/signup",
    "Request an API key: https://www.themoviedb.org/settings/api",
    "Edit the env file and enter your API key",
    "Run: movieskyy start",
];

/// What [`run_setup`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The file exists and holds a real key.
    AlreadyConfigured,
    /// The file exists but the key is missing or still the placeholder.
    NeedsKey,
    /// The file did not exist and a template was written.
    Created,
}

/// Template written when no env file exists.
pub fn env_template(api_key_var: &str) -> String {
    format!(
        "# TMDB API Key - get one at {API_KEY_URL}\n\
         {api_key_var}={PLACEHOLDER_API_KEY}\n\
         \n\
         # Public URL of this server\n\
         APP_URL=http://localhost:8080\n"
    )
}

/// Inspect `env_file`, creating it from the template if absent.
///
/// An existing file is never modified.
pub fn run_setup(env_file: &Path, api_key_var: &str) -> Result<SetupOutcome> {
    if env_file.exists() {
        let value = read_env_value(env_file, api_key_var)
            .with_context(|| format!("Failed to read {}", env_file.display()))?;

        let outcome = match value {
            Some(key) if is_usable_key(&key) => SetupOutcome::AlreadyConfigured,
            _ => SetupOutcome::NeedsKey,
        };
        tracing::debug!(?outcome, path = %env_file.display(), "Inspected env file");
        return Ok(outcome);
    }

    if let Some(parent) = env_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(env_file, env_template(api_key_var))
        .with_context(|| format!("Failed to write {}", env_file.display()))?;

    tracing::info!(path = %env_file.display(), "Created env file template");
    Ok(SetupOutcome::Created)
}

/// Human-readable report for a setup run.
pub fn report(outcome: SetupOutcome, env_file: &Path, api_key_var: &str) -> String {
    let path = env_file.display();
    let mut lines = vec![
        "MoviesKyy Setup".to_string(),
        "===============".to_string(),
        String::new(),
    ];

    match outcome {
        SetupOutcome::AlreadyConfigured => {
            lines.push(format!("✓ {path} already exists"));
            lines.push(format!("✓ {api_key_var} is set"));
            lines.push(String::new());
            lines.push("Ready to go! Run: movieskyy start".to_string());
        }
        SetupOutcome::NeedsKey => {
            lines.push(format!("✓ {path} already exists"));
            lines.push(format!("✗ {api_key_var} is not set correctly"));
            lines.push(String::new());
            lines.push(format!(
                "Edit {path} and replace \"{PLACEHOLDER_API_KEY}\" with your TMDB API key"
            ));
            lines.push(format!("Get an API key at: {API_KEY_URL}"));
        }
        SetupOutcome::Created => {
            lines.push(format!("✗ {path} not found"));
            lines.push(format!("✓ Created {path}"));
            lines.push(String::new());
            lines.push(format!(
                "Edit {path} and replace \"{PLACEHOLDER_API_KEY}\" with your TMDB API key"
            ));
            lines.push(format!("Get an API key at: {API_KEY_URL}"));
        }
    }

    lines.push(String::new());
    lines.push("Setup steps:".to_string());
    for (i, step) in SETUP_STEPS.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, step));
    }

    lines.join("\n")
}
