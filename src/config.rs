use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::time::Duration;

use crate::pipeline::collect::{DEFAULT_TIMELINE_LIMIT, DEFAULT_WORKERS};
use crate::twitter::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, RATE_LIMIT_WINDOW};

/// Central configuration loaded from environment variables.
///
/// Paths default to the conventional layout under `BUZZER_DATA_DIR`. The
/// .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Root of the data layout (timelines, profiles, dataset output)
    pub data_dir: PathBuf,
    /// Directory of JSON key files, one per Twitter app
    pub keys_dir: PathBuf,
    /// Twitter API endpoint (defaults to https://api.twitter.com)
    pub api_url: String,
    pub workers: usize,
    pub timeline_limit: usize,
    pub retry: RetryPolicy,
    /// Persisted social-political classifier (JSON artifact)
    pub model_path: PathBuf,
    /// Social-political lexicon CSV
    pub lexicon_path: PathBuf,
    /// JSON array of {screen_name, name, description}
    pub profile_path: PathBuf,
    /// Optional extra slang dictionary for the cleaning pass
    pub slang_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("BUZZER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let path_or = |var: &str, default: PathBuf| {
            env::var(var).map(PathBuf::from).unwrap_or(default)
        };

        let retry = RetryPolicy {
            backoff: Duration::from_secs(parse_var(
                "BUZZER_BACKOFF_SECS",
                RATE_LIMIT_WINDOW.as_secs(),
            )?),
            max_attempts: parse_var("BUZZER_MAX_RETRIES", DEFAULT_MAX_ATTEMPTS)?,
        };

        Ok(Self {
            keys_dir: path_or("BUZZER_KEYS_DIR", PathBuf::from("./keys")),
            api_url: env::var("TWITTER_API_URL")
                .unwrap_or_else(|_| crate::twitter::client::DEFAULT_API_URL.to_string()),
            workers: parse_var("BUZZER_WORKERS", DEFAULT_WORKERS)?,
            timeline_limit: parse_var("BUZZER_TIMELINE_LIMIT", DEFAULT_TIMELINE_LIMIT)?,
            retry,
            model_path: path_or(
                "BUZZER_MODEL_PATH",
                PathBuf::from("./model/social_political_clf.json"),
            ),
            lexicon_path: path_or("BUZZER_LEXICON_PATH", data_dir.join("SPWD.csv")),
            profile_path: path_or("BUZZER_PROFILE_PATH", data_dir.join("profile_id.json")),
            slang_path: env::var("BUZZER_SLANG_PATH").ok().map(PathBuf::from),
            data_dir,
        })
    }

    pub fn timeline_dir(&self) -> PathBuf {
        self.data_dir.join("user_timeline")
    }

    pub fn supports_dir(&self) -> PathBuf {
        self.data_dir.join("supports")
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.data_dir.join("dataset")
    }

    /// Check that the key directory exists.
    /// Call this before any operation that talks to the Twitter API.
    pub fn require_keys(&self) -> Result<()> {
        if !self.keys_dir.is_dir() {
            anyhow::bail!(
                "Key directory {} not found. Set BUZZER_KEYS_DIR to a directory of\n\
                 JSON key files (api_key, api_secret_key, optional bearer_token).",
                self.keys_dir.display()
            );
        }
        Ok(())
    }

    /// Check that the classifier artifact and lexicon exist.
    pub fn require_model(&self) -> Result<()> {
        require_file(&self.model_path, "BUZZER_MODEL_PATH", "classifier model")?;
        require_file(&self.lexicon_path, "BUZZER_LEXICON_PATH", "lexicon CSV")
    }

    /// Check that the profile directory file exists.
    pub fn require_profiles(&self) -> Result<()> {
        require_file(&self.profile_path, "BUZZER_PROFILE_PATH", "profile directory")
    }
}

fn require_file(path: &Path, var: &str, what: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(
            "{what} not found at {}. Set {var} to its location.",
            path.display()
        );
    }
    Ok(())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_var<T>(var: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{var} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: usize = parse_var("BUZZER_TEST_SURELY_UNSET_VAR", 10).unwrap();
        assert_eq!(value, 10);
    }

    #[test]
    fn test_require_file_reports_variable() {
        let err = require_file(
            Path::new("/nonexistent/model.json"),
            "BUZZER_MODEL_PATH",
            "classifier model",
        )
        .unwrap_err();
        assert!(err.to_string().contains("BUZZER_MODEL_PATH"));
    }
}
