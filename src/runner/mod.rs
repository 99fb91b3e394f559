pub mod ndjson;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::app::HostEvent;

pub use ndjson::{CommandSource, StdinSource};

/// Where host lifecycle events come from.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Stream events over the channel until the source is exhausted.
    async fn stream(&self, tx: mpsc::UnboundedSender<HostEvent>) -> Result<()>;

    /// Display name for this source (e.g., "stdin").
    fn name(&self) -> &str;
}

/// Pick the event source for the given command line.
///
/// No command reads stdin. A single argument is split like a shell would;
/// several arguments are taken verbatim.
pub fn detect(command: &[String]) -> Result<Box<dyn EventSource>> {
    let argv = match command {
        [] => return Ok(Box::new(StdinSource)),
        [single] => shell_words::split(single)
            .with_context(|| format!("failed to parse command `{single}`"))?,
        many => many.to_vec(),
    };

    let (program, args) = argv.split_first().context("empty host command")?;
    Ok(Box::new(CommandSource::new(program.clone(), args.to_vec())))
}
