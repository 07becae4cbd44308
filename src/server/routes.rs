//! Router configuration for the toolbox.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! upload limits, and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                               - Homepage
//! /tools/{tool}                   - Tool shell pages
//! /t/{tool}                       - Short redirects
//! /health, /ping                  - Status
//! /api/v1/images                  - Image optimization (POST)
//! /api/v1/usernames/{username}    - Streaming username scan
//! /static/*                       - Static assets
//! ```
//!
//! # Example
//!
//! ```ignore
//! use web_toolbox::scan::SherlockScanner;
//! use web_toolbox::server::{create_router, RouterConfig};
//!
//! let scanner = SherlockScanner::new("sherlock", "public/sherlock", 5);
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(scanner, config);
//!
//! // Run the server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{DEFAULT_CACHE_MAX_AGE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_STATIC_DIR};
use crate::scan::Scanner;

use super::handlers::{
    health_handler, home_handler, not_found_handler, optimize_image_handler, ping_handler,
    scan_usernames_handler, tool_page_handler, tool_redirect_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins for /api (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds for optimized images
    pub cache_max_age: u32,

    /// Upload size limit for the image API
    pub max_upload_bytes: usize,

    /// Directory of static assets served under /static
    pub static_dir: PathBuf,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is 1 year
    /// - Uploads are capped at 25 MiB
    /// - Static assets are served from `public`
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Set the upload size limit in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Set the static asset directory.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Pages (homepage, tool shells, redirects, 404 fallback)
/// - Status endpoints (health, ping)
/// - The JSON APIs under /api/v1 with CORS and an upload limit
/// - Static assets under /static
/// - Request tracing (optional)
pub fn create_router<S>(scanner: S, config: RouterConfig) -> Router
where
    S: Scanner,
{
    let app_state = AppState::with_cache_max_age(scanner, config.cache_max_age);

    let cors = build_cors_layer(&config);

    let api = Router::new()
        .route("/v1/images", post(optimize_image_handler::<S>))
        .route("/v1/usernames/{username}", get(scan_usernames_handler::<S>))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(app_state);

    let pages = Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .route("/tools/{tool}", get(tool_page_handler))
        .route("/t/{tool}", get(tool_redirect_handler));

    let router = Router::new()
        .nest("/api", api)
        .merge(pages)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .fallback(not_found_handler);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer for the API routes.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
