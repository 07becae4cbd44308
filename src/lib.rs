//! # Web Toolbox
//!
//! A personal web toolbox: a lightweight HTTP server hosting independent
//! client-side browser tools (image optimizer, username checker, webcam
//! tester, resolution inspector, keyboard tester) behind a homepage, plus
//! two thin JSON APIs.
//!
//! ## Features
//!
//! - **Streaming username scans**: spawns an external enumeration tool and
//!   relays its output to the client as newline-delimited JSON, event by
//!   event, killing the process if the client disconnects
//! - **Image optimization**: resize and re-encode uploads with fit modes and
//!   quality control, never enlarging
//! - **Server-rendered shells**: each tool page is a thin mount point for a
//!   client-side bundle served from /static
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scan`] - Username scan pipeline: spawn seam, line parser, NDJSON relay
//! - [`images`] - Image optimization pipeline
//! - [`server`] - Axum-based HTTP server, routes, and pages
//! - [`config`] - CLI and configuration types
//! - [`error`] - Domain error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use web_toolbox::scan::SherlockScanner;
//! use web_toolbox::server::{create_router, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scanner = SherlockScanner::new("sherlock", "public/sherlock", 5);
//!     let router = create_router(scanner, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod images;
pub mod scan;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{ImageError, ScanError};
pub use images::{FitMode, ImageOptimizer, OptimizeRequest, OutputFormat};
pub use scan::{
    PlatformResult, ScanEvent, ScanHandle, ScanRequest, Scanner, SherlockScanner, Terminate,
};
pub use server::{create_router, AppState, ErrorResponse, HealthResponse, RouterConfig};
