//! Hua Dict - Main entrypoint.
//!
//! Hosts the dictionary worker behind a JSON-lines protocol on stdin/stdout.
//! Logs go to stderr so they never mix with protocol output.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hua_dict_lib::config::{ConfigLoader, HuaConfig, LogConfig, ENV_PREFIX};
use hua_dict_lib::error::{set_error_reporter, TracingErrorReporter};
use hua_dict_lib::protocol::{CorrelationId, Request, Response};
use hua_dict_lib::service::{serve_lines, DictionaryService};
use hua_dict_lib::source::RoutingSource;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Hua Dict.
#[derive(Parser, Debug)]
#[clap(name = "Hua Dict", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Serve JSON requests from stdin, one per line
    Serve,

    /// Load a word list, then report membership and prefix results for words
    Lookup {
        /// Word list locator (defaults to the configured one)
        #[clap(short, long)]
        url: Option<String>,

        /// Estimated line count for progress reporting
        #[clap(short, long)]
        estimated: Option<u64>,

        /// Terms to look up
        #[clap(required = true)]
        words: Vec<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());
    let installed = if log.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer.pretty()).try_init()
    };

    installed.context("Failed to set global tracing subscriber")?;
    set_error_reporter(Arc::new(TracingErrorReporter));
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = loader.load().context("Configuration error")?;
            init_logging(&config.log)?;
            info!(name = %config.service.name, version = hua_dict_lib::VERSION, "serving on stdio");
            serve(config).await
        }
        Command::Lookup {
            url,
            estimated,
            words,
        } => {
            let config = loader.load().context("Configuration error")?;
            init_logging(&config.log)?;
            lookup(config, url, estimated, words).await
        }
        Command::Validate => {
            loader.load().context("Configuration validation error")?;
            println!("Configuration is valid");
            Ok(())
        }
        Command::GenConfig { output } => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, HuaConfig::default().to_toml()?)?;
            println!("Default configuration written to {}", output.display());
            Ok(())
        }
    }
}

/// Pumps stdin requests into the worker and worker responses to stdout.
async fn serve(config: HuaConfig) -> anyhow::Result<()> {
    let source = RoutingSource::new(&config.source).context("Failed to build byte source")?;
    let handle = DictionaryService::spawn(&config, Arc::new(source));

    serve_lines(
        tokio::io::stdin(),
        tokio::io::stdout(),
        handle,
        config.service.response_buffer,
    )
    .await
    .context("stdio host failed")?;

    info!("stdin closed, shutting down");
    Ok(())
}

/// Loads a word list and prints one line per word: term, contains, prefix.
async fn lookup(
    config: HuaConfig,
    url: Option<String>,
    estimated: Option<u64>,
    words: Vec<String>,
) -> anyhow::Result<()> {
    let source = RoutingSource::new(&config.source).context("Failed to build byte source")?;
    let mut dictionary = DictionaryService::spawn(&config, Arc::new(source));

    dictionary.send(Request::Load { url, estimated }).await?;
    loop {
        match dictionary.recv().await {
            Some(Response::Progress { loaded, pct }) => info!(loaded, pct, "loading"),
            Some(Response::Loaded { count }) => {
                info!(count, "word list loaded");
                break;
            }
            Some(Response::Error { message, .. }) => anyhow::bail!("load failed: {message}"),
            Some(_) => {}
            None => anyhow::bail!("dictionary worker stopped"),
        }
    }

    for (index, word) in words.iter().enumerate() {
        let id = index as i64;
        dictionary.send(Request::contains(id, word.as_str())).await?;
        dictionary.send(Request::is_prefix(id, word.as_str())).await?;
    }

    let mut answers = vec![(false, false); words.len()];
    let mut pending = words.len() * 2;
    while pending > 0 {
        let Some(response) = dictionary.recv().await else {
            anyhow::bail!("dictionary worker stopped");
        };
        match response {
            Response::Contains { id, result } => {
                if let Some(slot) = answer_slot(&mut answers, &id) {
                    slot.0 = result;
                }
            }
            Response::IsPrefix { id, result } => {
                if let Some(slot) = answer_slot(&mut answers, &id) {
                    slot.1 = result;
                }
            }
            _ => continue,
        }
        pending -= 1;
    }

    for (word, (contains, prefix)) in words.iter().zip(answers) {
        println!("{word}\tcontains={contains}\tprefix={prefix}");
    }

    dictionary.close().await?;
    Ok(())
}

fn answer_slot<'a>(
    answers: &'a mut [(bool, bool)],
    id: &CorrelationId,
) -> Option<&'a mut (bool, bool)> {
    match id {
        CorrelationId::Number(n) => answers.get_mut(usize::try_from(*n).ok()?),
        _ => None,
    }
}
