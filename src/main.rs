use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use azure::AzureBackend;
use speech_console::{ConsoleTerminal, DEFAULT_SETTINGS_FILE, Settings};

/// Text to speech and speech to text on the console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file with `subscriptionKey` and `region`
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Language of recognition and synthesis (BCP-47, e.g. en-US)
    #[arg(long)]
    language: Option<String>,

    /// Synthesis voice (e.g. en-US-AvaMultilingualNeural)
    #[arg(long)]
    voice: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // `.env` is optional, and does not override the process environment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Loading .env");
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let vars = env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    let params = Settings::load(&args.settings)?
        .with_env(vars)
        .with_overrides(args.language, args.voice)
        .into_params()?;

    let backend = AzureBackend::new(params);
    let mut terminal = ConsoleTerminal::new();

    speech_console::run(&backend, &mut terminal).await
}
