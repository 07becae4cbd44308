//! Relay from scanner process output to a live NDJSON event stream.
//!
//! The relay owns one spawned scan for its whole lifetime. It drains stdout
//! and stderr concurrently (a full pipe on either side must not stall the
//! child), forwards each recognized stdout line as an event the moment it is
//! parsed, and flushes stderr as at most one aggregated diagnostic event when
//! that pipe closes. On cancellation or a closed consumer the child is killed
//! immediately; there is no grace period and no retry.

use bytes::Bytes;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::parser::{summarize_stderr, LineAccumulator, PlatformResult, ResultLineParser};
use super::scanner::{PipeReader, ScanHandle, Terminate};

/// Terminal event message when the relay itself fails.
pub const STREAM_FAILURE_MESSAGE: &str = "An error occured!";

/// Read buffer size for each pipe.
const READ_BUFFER_SIZE: usize = 4096;

// =============================================================================
// Events
// =============================================================================

/// One event on the scan wire.
///
/// Serializes untagged: a result event is the bare [`PlatformResult`] object,
/// an error event is `{"error": "..."}`. These are the only two shapes that
/// ever appear on the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScanEvent {
    /// A parsed platform observation
    Result(PlatformResult),

    /// A diagnostic summary or terminal failure
    Error { error: String },
}

/// Encode one event as a single newline-terminated JSON line.
pub fn encode_event(event: &ScanEvent) -> Bytes {
    let mut line = match serde_json::to_vec(event) {
        Ok(line) => line,
        Err(_) => format!(r#"{{"error":"{STREAM_FAILURE_MESSAGE}"}}"#).into_bytes(),
    };
    line.push(b'\n');
    Bytes::from(line)
}

// =============================================================================
// Relay Loop
// =============================================================================

enum RelayFailure {
    /// A pipe read failed mid-stream
    Io(std::io::Error),

    /// The consumer dropped the receiving end
    ChannelClosed,
}

/// Drive one scan to completion, forwarding encoded events into `tx`.
///
/// Returns when both pipes are drained, the token is cancelled, or the
/// consumer goes away. In every exit path the child process has either
/// exited naturally or been killed before this function returns.
pub async fn run(handle: ScanHandle, tx: mpsc::Sender<Bytes>, cancel: CancellationToken) {
    let ScanHandle {
        stdout,
        stderr,
        mut terminator,
    } = handle;

    let outcome = tokio::select! {
        _ = cancel.cancelled() => {
            warn!("Scan stream aborted, killing scanner process");
            terminator.terminate();
            return;
        }
        outcome = drain(stdout, stderr, &tx) => outcome,
    };

    match outcome {
        Ok(()) => {}
        Err(RelayFailure::ChannelClosed) => {
            warn!("Scan consumer went away, killing scanner process");
            terminator.terminate();
        }
        Err(RelayFailure::Io(e)) => {
            error!("Scan stream error: {}", e);
            let event = ScanEvent::Error {
                error: STREAM_FAILURE_MESSAGE.to_string(),
            };
            let _ = tx.send(encode_event(&event)).await;
            terminator.terminate();
        }
    }
}

/// Drain both pipes to completion, joined at the end.
async fn drain(
    stdout: PipeReader,
    stderr: PipeReader,
    tx: &mpsc::Sender<Bytes>,
) -> Result<(), RelayFailure> {
    let (stdout_result, stderr_result) =
        tokio::join!(pump_stdout(stdout, tx), pump_stderr(stderr, tx));
    stdout_result.and(stderr_result)
}

/// Read stdout chunk by chunk, emitting an event per recognized line.
async fn pump_stdout(mut stdout: PipeReader, tx: &mpsc::Sender<Bytes>) -> Result<(), RelayFailure> {
    let parser = ResultLineParser::new();
    let mut lines = LineAccumulator::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = stdout.read(&mut buf).await.map_err(RelayFailure::Io)?;
        if n == 0 {
            break;
        }

        for line in lines.push(&buf[..n]) {
            forward_line(&parser, &line, tx).await?;
        }
    }

    // A final line without a trailing newline still counts
    if let Some(residual) = lines.finish() {
        forward_line(&parser, &residual, tx).await?;
    }

    Ok(())
}

async fn forward_line(
    parser: &ResultLineParser,
    line: &str,
    tx: &mpsc::Sender<Bytes>,
) -> Result<(), RelayFailure> {
    if let Some(result) = parser.parse(line) {
        tx.send(encode_event(&ScanEvent::Result(result)))
            .await
            .map_err(|_| RelayFailure::ChannelClosed)?;
    }
    Ok(())
}

/// Accumulate stderr until it closes, then emit at most one diagnostic event.
async fn pump_stderr(mut stderr: PipeReader, tx: &mpsc::Sender<Bytes>) -> Result<(), RelayFailure> {
    let mut raw = Vec::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        let n = stderr.read(&mut buf).await.map_err(RelayFailure::Io)?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }

    if let Some(summary) = summarize_stderr(&String::from_utf8_lossy(&raw)) {
        tx.send(encode_event(&ScanEvent::Error { error: summary }))
            .await
            .map_err(|_| RelayFailure::ChannelClosed)?;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
