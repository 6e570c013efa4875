use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("OPENAI_API_KEY is not set. Export it or add it to a .env file.")]
    CredentialMissing,
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("model returned a malformed question: {0}")]
    MalformedResponse(String),
    #[error("console I/O failed")]
    Io(#[from] io::Error),
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;
