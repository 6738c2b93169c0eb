//! CLI command definitions and handlers

use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::models::LanguageCode;
use crate::pipeline::Pipeline;

/// Commands for the kana translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Serve {
        /// Bind address (default: from config, 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: from config, 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Detect the language of a text
    Detect {
        /// Text to inspect
        text: String,
    },

    /// Translate a text
    Translate {
        /// Text to translate
        text: String,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        source: Option<String>,

        /// Target language (default: the configured target, ja)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Detect, translate to Japanese and render katakana
    Convert {
        /// Text to convert
        text: String,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        source: Option<String>,
    },
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Handle server command
pub async fn handle_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    println!("🚀 Server starting on http://{}:{}", config.host, config.port);
    println!("📄 OpenAPI document: http://{}:{}/api/openapi.json", config.host, config.port);

    run_server(config).await
}

/// Handle detect command
pub async fn handle_detect(config: AppConfig, text: String) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    let language = pipeline.detector().detect(&text).await;
    println!("{}", language);
    Ok(())
}

/// Handle translate command
pub async fn handle_translate(
    config: AppConfig,
    text: String,
    source: Option<String>,
    target: Option<String>,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config)?;

    let source = match source {
        Some(source) => LanguageCode::new(source),
        None => pipeline.detector().detect(&text).await,
    };
    let target = target
        .map(LanguageCode::new)
        .unwrap_or_else(|| pipeline.context().target_language().clone());

    let result = pipeline.translator().translate_to(&text, &source, &target).await;

    println!("{}", result.text);
    if !result.succeeded {
        anyhow::bail!("translation failed");
    }
    Ok(())
}

/// Handle convert command
pub async fn handle_convert(config: AppConfig, text: String, source: Option<String>) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let pipeline = Pipeline::from_config(config)?;

    let pb = spinner("Converting...");
    let outcome = pipeline.run(&text, source.map(LanguageCode::new)).await;
    pb.finish_and_clear();

    info!("Pipeline completed in {:?}", start_time.elapsed());

    println!("Language:    {}", outcome.source_language);
    println!("Translation: {}", outcome.translation.text);
    println!("Katakana:    {}", outcome.transliteration.primary);
    if let Some(hint) = &outcome.transliteration.pronunciation_hint {
        println!("Romaji:      {}", hint);
    }

    Ok(())
}
