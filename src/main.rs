use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use helpful::{Config, CrosstermTerminal, Reporter, handle_host_event, runner};

/// Render a browser test run reported as NDJSON lifecycle events.
#[derive(Debug, Parser)]
#[command(name = "helpful", version, about)]
struct Cli {
    /// Reporter config file (.toml or .json). Defaults to ./helpful.toml when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Terminal width to lay out for instead of the detected one.
    #[arg(long, value_name = "N")]
    width: Option<u16>,

    /// Host command emitting events on stdout. Reads stdin when omitted.
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<String>,
}

/// Log to the file named by `HELPFUL_LOG`; stdout belongs to the report.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("HELPFUL_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", PathBuf::from(&path).display()))?;
    let level = std::env::var("HELPFUL_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
    let filter = EnvFilter::try_new(&level).with_context(|| format!("invalid log level `{level}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => Ok(Config::from_path(path)?),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Ok(Config::load(&cwd))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = load_config(cli.config.as_ref())?;
    let term = match cli.width {
        Some(width) => {
            let (_, height) = crossterm::terminal::size().unwrap_or((width, 24));
            CrosstermTerminal::with_size(std::io::stdout(), width, height)
        }
        None => CrosstermTerminal::stdout(),
    };
    let mut reporter = Reporter::new(config, term);

    let source = runner::detect(&cli.command)?;
    tracing::debug!(source = source.name(), "reading host events");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let producer = tokio::spawn(async move { source.stream(tx).await });

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                tracing::trace!(event = event.name(), "dispatch");
                if let Err(e) = handle_host_event(&mut reporter, event) {
                    let _ = reporter.restore_cursor();
                    return Err(e.into());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                interrupted = true;
                break;
            }
        }
    }

    reporter.restore_cursor()?;

    if interrupted {
        // Dropping the stream kills the host command's process group.
        producer.abort();
        let _ = producer.await;
        std::process::exit(130);
    }
    producer.await.context("event source panicked")??;

    if !reporter.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}
