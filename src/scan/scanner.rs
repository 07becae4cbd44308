//! Scanner process abstraction.
//!
//! [`Scanner`] is the seam between the relay and the OS: the production
//! [`SherlockScanner`] spawns the external enumeration binary with piped
//! stdio, while tests substitute fakes that replay canned output or record
//! spawn attempts.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::ScanError;

/// Minimum accepted username length, in characters.
pub const MIN_USERNAME_CHARS: usize = 1;

/// Maximum accepted username length, in characters.
pub const MAX_USERNAME_CHARS: usize = 64;

// =============================================================================
// Scan Request
// =============================================================================

/// A validated scan target.
///
/// Construction is the single validation point: a `ScanRequest` in hand means
/// the username is 1-64 characters, and no process is ever spawned for
/// anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    username: String,
}

impl ScanRequest {
    /// Validate a username and wrap it for the lifetime of one scan.
    pub fn new(username: impl Into<String>) -> Result<Self, ScanError> {
        let username = username.into();
        let length = username.chars().count();

        if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&length) {
            return Err(ScanError::InvalidUsername { length });
        }

        Ok(Self { username })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

// =============================================================================
// Spawn Seam
// =============================================================================

/// Boxed reader over one of the child's output pipes.
pub type PipeReader = Box<dyn AsyncRead + Send + Unpin>;

/// Handle used to kill the scan process ahead of natural exit.
pub trait Terminate: Send {
    /// Synchronously request process termination. Safe to call after exit.
    fn terminate(&mut self);
}

/// Everything the relay needs from one spawned scan.
///
/// The handle exclusively owns the child process for the scan's lifetime;
/// dropping it reaps the process if it is still running.
pub struct ScanHandle {
    pub stdout: PipeReader,
    pub stderr: PipeReader,
    pub terminator: Box<dyn Terminate>,
}

/// Spawner for scan processes.
#[async_trait]
pub trait Scanner: Send + Sync + 'static {
    /// Launch exactly one scan process bound to the request's username.
    async fn spawn(&self, request: &ScanRequest) -> Result<ScanHandle, ScanError>;
}

// =============================================================================
// Sherlock Scanner
// =============================================================================

/// Production scanner backed by the `sherlock` command-line tool.
///
/// Invoked with flags requesting machine-parsable complete results, a fixed
/// per-platform probe timeout, and a per-username output folder. Any binary
/// that preserves the bracketed-symbol line format can be substituted via
/// the configured binary name.
#[derive(Debug, Clone)]
pub struct SherlockScanner {
    binary: String,
    output_root: PathBuf,
    probe_timeout_secs: u64,
}

impl SherlockScanner {
    pub fn new(
        binary: impl Into<String>,
        output_root: impl Into<PathBuf>,
        probe_timeout_secs: u64,
    ) -> Self {
        Self {
            binary: binary.into(),
            output_root: output_root.into(),
            probe_timeout_secs,
        }
    }

    /// Command-line arguments for one scan invocation.
    fn build_args(&self, request: &ScanRequest) -> Vec<String> {
        vec![
            "--csv".to_string(),
            "--print-all".to_string(),
            "--timeout".to_string(),
            self.probe_timeout_secs.to_string(),
            "--folderoutput".to_string(),
            self.output_root
                .join(request.username())
                .to_string_lossy()
                .into_owned(),
            request.username().to_string(),
        ]
    }
}

#[async_trait]
impl Scanner for SherlockScanner {
    async fn spawn(&self, request: &ScanRequest) -> Result<ScanHandle, ScanError> {
        let mut child = Command::new(&self.binary)
            .args(self.build_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScanError::Spawn(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ScanError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(ScanError::MissingPipe("stderr"))?;

        debug!(username = request.username(), "Spawned scanner process");

        Ok(ScanHandle {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            terminator: Box::new(ChildTerminator { child }),
        })
    }
}

/// Kill handle wrapping the real child process.
struct ChildTerminator {
    child: Child,
}

impl Terminate for ChildTerminator {
    fn terminate(&mut self) {
        // start_kill fails when the process has already exited
        if let Err(e) = self.child.start_kill() {
            debug!("Scanner kill request ignored: {}", e);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
