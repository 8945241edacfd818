// clowder - command line front end for the cat agents

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clowder::config::Settings;
use clowder::orchestration::responses::SingleResponse;
use clowder::orchestration::{Orchestrator, VideoFormat};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Moderate, translate and imagine cats with Gemini", long_about = None)]
struct Args {
    /// Configuration file (defaults to ~/.config/clowder/config.toml)
    #[arg(short, long, global = true, env = "CLOWDER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Moderate then translate text into cat language
    Pipeline {
        text: Vec<String>,

        /// Translate without the moderation stage
        #[arg(long)]
        skip_moderation: bool,
    },

    /// Run one agent (moderator or translator)
    Single {
        /// Agent type name
        #[arg(short, long, default_value = "translator")]
        agent: String,

        text: Vec<String>,
    },

    /// Identify likely breeds from a description
    Breed { description: Vec<String> },

    /// Generate a cat image from a prompt
    Image { prompt: Vec<String> },

    /// Animate an image (not yet available)
    Video {
        image: String,

        /// mp4 or gif
        #[arg(short, long, default_value = "mp4")]
        format: VideoFormat,
    },

    /// Moderate a prompt, match its breed and render it
    Dream { prompt: Vec<String> },

    /// Describe the available agents
    Agents,

    /// List Gemini models that support text generation
    Models,
}

fn joined(words: &[String]) -> Result<String> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        bail!("No text provided");
    }
    Ok(text)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("✓ Loaded .env file from: {}", path.display());
    }

    let args = Args::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("clowder={log_level},gemini={log_level},imagent={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(model = %settings.gemini.model, timeout_secs = settings.timeout_secs, "settings loaded");

    let orchestrator = || Orchestrator::from_settings(&settings);

    match args.command {
        Command::Pipeline { text, skip_moderation } => {
            let text = joined(&text)?;
            let cancel = async {
                if tokio::signal::ctrl_c().await.is_err() {
                    std::future::pending::<()>().await;
                }
            };
            match orchestrator()?.run_pipeline_until(&text, skip_moderation, cancel).await {
                Ok(run) => print_json(&run)?,
                Err(cancelled) => bail!(cancelled),
            }
        }
        Command::Single { agent, text } => {
            let text = joined(&text)?;
            let response = SingleResponse::from(orchestrator()?.run_single(&text, &agent).await);
            print_json(&response)?;
        }
        Command::Breed { description } => {
            let description = joined(&description)?;
            print_json(&orchestrator()?.match_breed(&description).await)?;
        }
        Command::Image { prompt } => {
            let prompt = joined(&prompt)?;
            print_json(&orchestrator()?.generate_image(&prompt).await)?;
        }
        Command::Video { image, format } => {
            print_json(&orchestrator()?.generate_video(&image, format))?;
        }
        Command::Dream { prompt } => {
            let prompt = joined(&prompt)?;
            print_json(&orchestrator()?.dream_cat(&prompt).await)?;
        }
        Command::Agents => print_json(&orchestrator()?.agents_info())?,
        Command::Models => list_models(&settings).await?,
    }

    Ok(())
}

async fn list_models(settings: &Settings) -> Result<()> {
    let mut config = gemini::GeminiConfig::new(
        settings.gemini.api_key.clone().unwrap_or_default(),
        settings.gemini.model.clone(),
    );
    config.endpoint = settings.gemini.endpoint.clone();
    config.timeout = settings.timeout();

    let client = gemini::GeminiClient::new(config)?;
    let models = client.list_models().await.context("failed to list models")?;

    println!("Available models ({}):", models.len());
    for model in models {
        if model.display_name.is_empty() {
            println!("  - {}", model.name);
        } else {
            println!("  - {} ({})", model.name, model.display_name);
        }
    }
    Ok(())
}
