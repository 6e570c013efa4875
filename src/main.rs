use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};

use quizgen::config::{
    self, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DotenvStatus, MAX_TOKENS_ENV, MIN_OUTPUT_TOKENS,
    MODEL_ENV, Settings,
};
use quizgen::utils::pluralize;
use quizgen::{Session, llm};

#[derive(Parser, Debug)]
#[command(
    name = "quizgen",
    version,
    about = "Multiple-choice questions on any topic, generated by an LLM.",
    long_about = None
)]
struct Cli {
    /// Model used to generate questions
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_MODEL)]
    model: String,
    /// Upper bound on tokens the model may spend on one question
    #[arg(
        long = "max-tokens",
        value_name = "COUNT",
        env = MAX_TOKENS_ENV,
        default_value_t = DEFAULT_MAX_OUTPUT_TOKENS,
        value_parser = clap::value_parser!(u32).range((MIN_OUTPUT_TOKENS as i64)..)
    )]
    max_tokens: u32,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    // Before parsing, so clap's env fallbacks see values from .env too.
    let dotenv_status = config::load_dotenv(None);
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str())).init();

    match dotenv_status {
        DotenvStatus::Loaded(path) => debug!("Loaded environment from {}", path.display()),
        DotenvStatus::Missing => debug!("No .env file found"),
        DotenvStatus::Invalid(err) => warn!("Ignoring .env file: {err}"),
    }

    let api_key = config::api_key_from_env()?;
    let settings = Settings::new(api_key, cli.model, cli.max_tokens);
    debug!("{settings:?}");

    let client = llm::initialize_client(&settings);
    info!("Generating questions with {}", client.model());
    let summary = Session::new(&client, io::stdin().lock(), io::stdout())
        .run()
        .await
        .context("Quiz stopped")?;

    info!(
        "Answered {}, {} correct",
        pluralize("question", summary.answered),
        summary.correct
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn max_tokens_below_api_minimum_is_rejected() {
        assert!(Cli::try_parse_from(["quizgen", "--max-tokens", "5"]).is_err());
        assert!(Cli::try_parse_from(["quizgen", "--max-tokens", "15"]).is_err());

        let cli = Cli::try_parse_from(["quizgen", "--max-tokens", "16"]).unwrap();
        assert_eq!(cli.max_tokens, MIN_OUTPUT_TOKENS);
    }
}
