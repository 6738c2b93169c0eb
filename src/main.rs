//! Main entry point for the kana translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kana_translator::cli::commands::{self, Commands};
use kana_translator::core::config::AppConfig;
use kana_translator::core::models::Provider;

/// Kana translator - language detection, Japanese translation and katakana rendering
#[derive(Parser, Debug)]
#[command(name = "kana-translator", version, about, long_about = None)]
struct Args {
    /// Hugging Face token (optional, defaults to HUGGINGFACE_API_KEY env var)
    #[arg(long)]
    hf_token: Option<String>,

    /// Google Translate API key (optional, defaults to GOOGLE_TRANSLATE_API_KEY env var)
    #[arg(long)]
    google_key: Option<String>,

    /// Remote provider: huggingface or google
    #[arg(long)]
    provider: Option<Provider>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("kana_translator={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Override config with CLI args if provided
    let mut config = AppConfig::load()?;
    if let Some(token) = args.hf_token {
        config.huggingface_api_key = Some(token);
    }
    if let Some(key) = args.google_key {
        config.google_api_key = Some(key);
    }
    if let Some(provider) = args.provider {
        config.provider = provider;
    }

    match args.command {
        Some(Commands::Serve { host, port }) => commands::handle_serve(config, host, port).await?,
        Some(Commands::Detect { text }) => commands::handle_detect(config, text).await?,
        Some(Commands::Translate { text, source, target }) => {
            commands::handle_translate(config, text, source, target).await?
        }
        Some(Commands::Convert { text, source }) => commands::handle_convert(config, text, source).await?,
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
