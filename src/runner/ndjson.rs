use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::app::HostEvent;

use super::EventSource;

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Option<tokio::process::Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }

    /// Wait for the child and disarm the guard.
    async fn wait(&mut self) -> Result<std::process::ExitStatus> {
        let mut child = self.child.take().context("child already reaped")?;
        #[cfg(unix)]
        {
            self.pgid = None;
        }
        child.wait().await.context("failed to wait for host command")
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Browsers launched by the host live in its process group; take them down too.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        if let Some(ref mut child) = self.child {
            let _ = child.start_kill();
        }
    }
}

/// Read one line, replacing invalid UTF-8. `None` at end of stream.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    match reader.read_until(b'\n', buf).await {
        Ok(0) => None,
        Ok(_) => Some(
            String::from_utf8_lossy(&buf[..])
                .trim_end_matches(['\n', '\r'])
                .to_string(),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "stream read failed");
            None
        }
    }
}

/// Forward every event line of `reader` to `tx`. Returns the number of events sent.
async fn forward_lines<R>(mut reader: R, tx: &mpsc::UnboundedSender<HostEvent>, origin: &str) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut sent = 0;
    while let Some(line) = read_line_lossy(&mut reader, &mut buf).await {
        match HostEvent::parse(&line) {
            Some(event) => {
                tracing::trace!(origin, event = event.name(), "host event");
                if tx.send(event).is_err() {
                    break;
                }
                sent += 1;
            }
            None if line.trim().is_empty() => {}
            // Banner or stray output; it must not reach the terminal mid-chart.
            None => tracing::debug!(origin, %line, "dropping non-event output"),
        }
    }
    sent
}

/// Reads NDJSON events piped into this process.
pub struct StdinSource;

#[async_trait]
impl EventSource for StdinSource {
    async fn stream(&self, tx: mpsc::UnboundedSender<HostEvent>) -> Result<()> {
        let sent = forward_lines(BufReader::new(tokio::io::stdin()), &tx, "stdin").await;
        tracing::debug!(sent, "stdin closed");
        Ok(())
    }

    fn name(&self) -> &str {
        "stdin"
    }
}

/// Spawns the host runner and reads NDJSON events from its stdout.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    display: String,
}

impl CommandSource {
    pub fn new(program: String, args: Vec<String>) -> Self {
        let display = shell_words::join(std::iter::once(&program).chain(args.iter()));
        Self {
            program,
            args,
            display,
        }
    }
}

#[async_trait]
impl EventSource for CommandSource {
    async fn stream(&self, tx: mpsc::UnboundedSender<HostEvent>) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        tracing::debug!(command = %self.display, "spawning host command");

        // Own process group so the guard can kill everything the host forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        let mut child = cmd
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.display))?;

        let stdout = child.stdout.take().context("missing stdout")?;
        let stderr = child.stderr.take().context("missing stderr")?;
        let mut child_guard = ChildGuard::new(child);

        // Drain stderr so the host cannot block on a full pipe.
        let stderr_handle = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr);
            let mut buf = Vec::new();
            while let Some(line) = read_line_lossy(&mut reader, &mut buf).await {
                tracing::debug!(%line, "host stderr");
            }
        });

        let sent = forward_lines(BufReader::new(stdout), &tx, &self.display).await;
        stderr_handle.await.ok();

        let status = child_guard.wait().await?;
        tracing::debug!(sent, code = ?status.code(), "host command exited");
        if !status.success() && sent == 0 {
            anyhow::bail!(
                "`{}` exited with code {} before sending any events",
                self.display,
                status.code().unwrap_or(-1)
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_events_and_skips_noise() {
        let input = concat!(
            "Karma server started\n",
            "{\"type\":\"run-start\",\"browsers\":[]}\n",
            "\n",
            "{\"type\":\"run-complete\"}\n",
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sent = forward_lines(BufReader::new(input.as_bytes()), &tx, "test").await;
        drop(tx);

        assert_eq!(sent, 2);
        assert!(matches!(rx.recv().await, Some(HostEvent::RunStart { .. })));
        assert!(matches!(rx.recv().await, Some(HostEvent::RunComplete)));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_end_the_stream() {
        let mut input = b"{\"type\":\"run-start\"}\n".to_vec();
        input.extend_from_slice(b"banner \xff\xfe garbage\n");
        input.extend_from_slice(b"{\"type\":\"run-complete\"}\r\n");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let sent = forward_lines(BufReader::new(input.as_slice()), &tx, "test").await;
        drop(tx);

        assert_eq!(sent, 2);
        assert!(matches!(rx.recv().await, Some(HostEvent::RunStart { .. })));
        assert!(matches!(rx.recv().await, Some(HostEvent::RunComplete)));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut reader = BufReader::new(&b"a\nb"[..]);
        let mut buf = Vec::new();
        assert_eq!(read_line_lossy(&mut reader, &mut buf).await.as_deref(), Some("a"));
        assert_eq!(read_line_lossy(&mut reader, &mut buf).await.as_deref(), Some("b"));
        assert_eq!(read_line_lossy(&mut reader, &mut buf).await, None);
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let source = CommandSource::new("node".into(), vec!["run karma.js".into()]);
        assert_eq!(source.name(), "node 'run karma.js'");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn streams_events_from_a_spawned_command() {
        let source = CommandSource::new(
            "sh".into(),
            vec![
                "-c".into(),
                r#"echo '{"type":"run-start"}'; echo noise; echo '{"type":"run-complete"}'"#.into(),
            ],
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        source.stream(tx).await.unwrap();

        assert!(matches!(rx.recv().await, Some(HostEvent::RunStart { .. })));
        assert!(matches!(rx.recv().await, Some(HostEvent::RunComplete)));
        assert!(rx.recv().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_without_events_is_an_error() {
        let source = CommandSource::new("sh".into(), vec!["-c".into(), "exit 3".into()]);
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = source.stream(tx).await.unwrap_err();
        assert!(err.to_string().contains("code 3"));
    }
}
