//! Username scan pipeline.
//!
//! This module turns one validated username into a live stream of
//! availability events by driving an external enumeration tool:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handler               │
//! └────────────────────┬────────────────────┘
//!                      │ ScanRequest
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            Scanner (trait)              │
//! │   spawn → ScanHandle (stdout/stderr)    │
//! └────────────────────┬────────────────────┘
//!                      │ pipes
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │                 Relay                   │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ line parser  │  │ stderr summary  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! │        NDJSON events, kill on abort     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ScanRequest`]: a validated username, immutable for the scan's lifetime
//! - [`Scanner`]: the spawn seam; [`SherlockScanner`] is the production impl
//! - [`parser`]: pure line-splitting and line-format matching, no I/O
//! - [`relay`]: drains both pipes concurrently and forwards events as they
//!   are recognized

pub mod parser;
pub mod relay;
pub mod scanner;

pub use parser::{summarize_stderr, LineAccumulator, PlatformResult, ResultLineParser};
pub use relay::{encode_event, ScanEvent};
pub use scanner::{
    PipeReader, ScanHandle, ScanRequest, Scanner, SherlockScanner, Terminate, MAX_USERNAME_CHARS,
    MIN_USERNAME_CHARS,
};
