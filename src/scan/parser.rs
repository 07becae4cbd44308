//! Incremental parsing of the scanner's line-oriented output.
//!
//! The scanner writes UTF-8 text to stdout, one observation per line, but
//! reads off the pipe are not aligned to line boundaries. [`LineAccumulator`]
//! carries the partial tail across reads; [`ResultLineParser`] matches
//! complete lines against the fixed `[{+,-}] platform: detail` format.
//!
//! Everything in this module is pure and synchronous so it can be tested
//! without a process or a pipe.

use regex::Regex;
use serde::Serialize;

/// Default status message for a parsed observation.
pub const DEFAULT_MESSAGE: &str = "Found!";

/// Marker prefixing diagnostic lines on the scanner's stderr.
pub const STDERR_ERROR_MARKER: &str = "sherlock: error:";

// =============================================================================
// Wire Types
// =============================================================================

/// One parsed observation about one platform.
///
/// `available` is inverted relative to the naive reading of the source line:
/// `+` marks a positive match (profile found, username taken), `-` marks
/// absence (username available). This is the output contract of the external
/// tool, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformResult {
    /// Platform name as printed by the scanner
    pub id: String,

    /// True when the username was NOT found on the platform
    pub available: bool,

    /// Human-readable status (defaults to "Found!")
    pub message: String,

    /// Profile URL when the detail string is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// =============================================================================
// Line Accumulator
// =============================================================================

/// Carry-over buffer that reassembles lines from arbitrary read chunks.
///
/// Bytes are accumulated and split at `\n`; each complete line is decoded
/// (lossily) and trimmed only once it is whole, so a multi-byte character
/// split across two reads survives intact.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buf: Vec<u8>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append a read chunk and drain every complete line it unlocks.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(&self.buf[..pos]).trim().to_string();
            self.buf.drain(..=pos);
            lines.push(line);
        }
        lines
    }

    /// Consume the accumulator, yielding the residual partial line if any.
    pub fn finish(self) -> Option<String> {
        let residual = String::from_utf8_lossy(&self.buf).trim().to_string();
        if residual.is_empty() {
            None
        } else {
            Some(residual)
        }
    }
}

// =============================================================================
// Result Line Parser
// =============================================================================

/// Matcher for the scanner's `[{+,-}] platform: detail` stdout lines.
pub struct ResultLineParser {
    pattern: Regex,
}

impl ResultLineParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\[([+-])\]\s*(.+?):\s*(.+)$").expect("result line pattern"),
        }
    }

    /// Parse one complete line into a [`PlatformResult`].
    ///
    /// Returns `None` for lines that do not match the format; those are
    /// dropped silently by the relay.
    pub fn parse(&self, line: &str) -> Option<PlatformResult> {
        let caps = self.pattern.captures(line)?;

        let available = &caps[1] == "-";
        let platform = caps[2].trim();
        let detail = caps[3].trim();

        let mut result = PlatformResult {
            id: platform.to_string(),
            available,
            message: DEFAULT_MESSAGE.to_string(),
            url: None,
        };

        if detail.starts_with("http") {
            result.url = Some(detail.to_string());
        } else if !detail.is_empty() {
            result.message = detail.to_string();
        }

        Some(result)
    }
}

impl Default for ResultLineParser {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Stderr Summary
// =============================================================================

/// Aggregate the scanner's stderr into a single diagnostic message.
///
/// Keeps lines starting with [`STDERR_ERROR_MARKER`], strips the marker from
/// each, joins the remainders with single spaces and trims. Everything else
/// on stderr is discarded.
pub fn summarize_stderr(raw: &str) -> Option<String> {
    let summary = raw
        .lines()
        .filter_map(|line| line.strip_prefix(STDERR_ERROR_MARKER))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

// =============================================================================
// Tests
// =============================================================================
