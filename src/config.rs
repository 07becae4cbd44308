//! Configuration management for the web toolbox server.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TOOLBOX_` prefix
//! - Sensible defaults for all settings
//!
//! # Example
//!
//! ```ignore
//! use web_toolbox::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the `TOOLBOX_` prefix:
//!
//! - `TOOLBOX_HOST` - Server bind address (default: 0.0.0.0)
//! - `TOOLBOX_PORT` - Server port (default: 8080)
//! - `TOOLBOX_STATIC_DIR` - Directory served under /static (default: public)
//! - `TOOLBOX_CORS_ORIGINS` - Allowed CORS origins for /api (default: any)
//! - `TOOLBOX_CACHE_MAX_AGE` - Cache-Control max-age for optimized images (default: 1 year)
//! - `TOOLBOX_MAX_UPLOAD_BYTES` - Upload size limit for the image API (default: 25MiB)
//! - `TOOLBOX_SCANNER_BIN` - Username scanner binary (default: sherlock)
//! - `TOOLBOX_SCAN_OUTPUT_DIR` - Per-scan output folder root (default: public/sherlock)
//! - `TOOLBOX_SCAN_PROBE_TIMEOUT` - Scanner per-platform probe timeout in seconds (default: 5)

use std::path::PathBuf;

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Default HTTP cache max-age in seconds (1 year, assets are content-addressed).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 31_536_000;

/// Default upload size limit for the image API (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Default username scanner binary.
pub const DEFAULT_SCANNER_BIN: &str = "sherlock";

/// Default root directory for per-scan output folders.
pub const DEFAULT_SCAN_OUTPUT_DIR: &str = "public/sherlock";

/// Default per-platform probe timeout passed to the scanner, in seconds.
pub const DEFAULT_SCAN_PROBE_TIMEOUT: u64 = 5;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Web Toolbox - a collection of browser tools behind a lightweight server.
///
/// Serves a homepage linking to independent client-side tools, an image
/// optimization API, and a streaming username-scan API.
#[derive(Parser, Debug, Clone)]
#[command(name = "web-toolbox")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TOOLBOX_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TOOLBOX_PORT")]
    pub port: u16,

    /// Directory of static assets served under /static.
    #[arg(long, default_value = DEFAULT_STATIC_DIR, env = "TOOLBOX_STATIC_DIR")]
    pub static_dir: PathBuf,

    // =========================================================================
    // API Configuration
    // =========================================================================
    /// Allowed CORS origins for /api routes (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "TOOLBOX_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// HTTP Cache-Control max-age in seconds for optimized images.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TOOLBOX_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Maximum accepted upload size in bytes for the image API.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "TOOLBOX_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // Scanner Configuration
    // =========================================================================
    /// Username scanner binary to spawn for /api/v1/usernames.
    #[arg(long, default_value = DEFAULT_SCANNER_BIN, env = "TOOLBOX_SCANNER_BIN")]
    pub scanner_bin: String,

    /// Root directory where the scanner writes its per-username output folder.
    #[arg(long, default_value = DEFAULT_SCAN_OUTPUT_DIR, env = "TOOLBOX_SCAN_OUTPUT_DIR")]
    pub scan_output_dir: PathBuf,

    /// Per-platform probe timeout passed to the scanner, in seconds.
    #[arg(long, default_value_t = DEFAULT_SCAN_PROBE_TIMEOUT, env = "TOOLBOX_SCAN_PROBE_TIMEOUT")]
    pub scan_probe_timeout: u64,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.scanner_bin.trim().is_empty() {
            return Err(
                "Scanner binary is required. Set --scanner-bin or TOOLBOX_SCANNER_BIN".to_string(),
            );
        }

        if self.scan_probe_timeout == 0 {
            return Err("scan_probe_timeout must be greater than 0".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        if self.static_dir.as_os_str().is_empty() {
            return Err("static_dir must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
