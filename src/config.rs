use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{QuizError, Result};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "QUIZGEN_MODEL";
pub const MAX_TOKENS_ENV: &str = "QUIZGEN_MAX_TOKENS";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 150;
/// The Responses API rejects smaller output budgets.
pub const MIN_OUTPUT_TOKENS: u32 = 16;

/// Everything the question fetcher needs to talk to the remote model.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
}

impl Settings {
    pub fn new(api_key: String, model: String, max_output_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            max_output_tokens,
        }
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Missing,
    Invalid(String),
}

/// Loads `.env` from the working directory (or `path`, if given) into the
/// process environment. Variables that are already set win over the file.
///
/// Runs before the logger exists, so the outcome is returned for the caller
/// to report.
pub fn load_dotenv(path: Option<&Path>) -> DotenvStatus {
    let result = match path {
        Some(path) => dotenv::from_path(path).map(|_| path.to_path_buf()),
        None => dotenv::dotenv(),
    };

    match result {
        Ok(loaded) => DotenvStatus::Loaded(loaded),
        Err(dotenv::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            DotenvStatus::Missing
        }
        Err(err) => DotenvStatus::Invalid(err.to_string()),
    }
}

pub fn api_key_from_env() -> Result<String> {
    resolve_api_key(env::var(API_KEY_ENV).ok())
}

fn resolve_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(QuizError::CredentialMissing),
    }
}
