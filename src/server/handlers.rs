//! HTTP request handlers for the toolbox.
//!
//! This module contains the Axum handlers for the pages, the image
//! optimization API, and the streaming username-scan API.
//!
//! # Endpoints
//!
//! - `GET /` - Homepage
//! - `GET /tools/{tool}` - Tool shell page
//! - `GET /t/{tool}` - Short redirect to /tools/{tool}
//! - `GET /health` - Health check
//! - `GET /ping` - Liveness probe
//! - `POST /api/v1/images` - Optimize an uploaded image
//! - `GET /api/v1/usernames/{username}` - Stream a username scan as NDJSON

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::error::{ImageError, ScanError};
use crate::images::{
    FitMode, ImageOptimizer, OptimizeRequest, OutputFormat, MAX_DIMENSION, MAX_QUALITY,
    MIN_DIMENSION, MIN_QUALITY,
};
use crate::scan::{relay, ScanRequest, Scanner};

use super::pages;

/// Capacity of the relay-to-response event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to handlers via Axum's State extractor.
pub struct AppState<S: Scanner> {
    /// Spawner for username scan processes
    pub scanner: Arc<S>,

    /// Image optimization pipeline
    pub optimizer: ImageOptimizer,

    /// Cache-Control max-age for optimized image responses
    pub cache_max_age: u32,
}

impl<S: Scanner> AppState<S> {
    /// Create a new application state with the given scanner.
    pub fn new(scanner: S) -> Self {
        Self {
            scanner: Arc::new(scanner),
            optimizer: ImageOptimizer::new(),
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(scanner: S, cache_max_age: u32) -> Self {
        Self {
            scanner: Arc::new(scanner),
            optimizer: ImageOptimizer::new(),
            cache_max_age,
        }
    }
}

impl<S: Scanner> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            scanner: Arc::clone(&self.scanner),
            optimizer: self.optimizer.clone(),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all API error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "validation_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ScanError to HTTP response.
///
/// Validation failures are the caller's fault (400); spawn failures are ours
/// (500). 4xx are logged at WARN, 5xx at ERROR.
impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ScanError::InvalidUsername { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            ScanError::Spawn(_) | ScanError::MissingPipe(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scanner_error")
            }
        };

        let message = self.to_string();
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Convert ImageError to HTTP response.
impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        let (status, error_type) = if self.is_client_error() {
            (StatusCode::BAD_REQUEST, "validation_error")
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "encode_error")
        };

        let message = self.to_string();
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Status Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle liveness probes.
pub async fn ping_handler() -> &'static str {
    "pong"
}

// =============================================================================
// Page Handlers
// =============================================================================

/// Serve the homepage.
pub async fn home_handler() -> Html<String> {
    Html(pages::render_homepage())
}

/// Serve a tool's shell page, or the 404 page for unknown tools.
pub async fn tool_page_handler(Path(tool): Path<String>) -> Response {
    match pages::find_tool(&tool) {
        Some(tool) => Html(pages::render_tool_page(tool)).into_response(),
        None => not_found_handler().await.into_response(),
    }
}

/// Redirect the short /t/{tool} form to /tools/{tool}.
pub async fn tool_redirect_handler(Path(tool): Path<String>) -> Response {
    match pages::find_tool(&tool) {
        Some(tool) => Redirect::permanent(&format!("/tools/{}", tool.slug)).into_response(),
        None => not_found_handler().await.into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::render_not_found()))
}

// =============================================================================
// Image API
// =============================================================================

/// Handle image optimization requests.
///
/// # Endpoint
///
/// `POST /api/v1/images`
///
/// # Form Fields (multipart)
///
/// - `file`: The image to optimize (required)
/// - `width`, `height`: Target dimensions, 1-4096 (default: 64)
/// - `quality`: Encoding quality, 1-100 (default: 64, JPEG only)
/// - `fit`: contain | cover | fill | inside | outside (default: contain)
/// - `format`: png | jpeg | jpg | webp | gif | bmp | tiff | tif (default: png)
///
/// # Response
///
/// - `200 OK`: Optimized image with `Content-Type: image/{format}`
/// - `400 Bad Request`: Missing/empty/undecodable file, out-of-range field
/// - `500 Internal Server Error`: Encoding failure
pub async fn optimize_image_handler<S: Scanner>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Response, ImageError> {
    let mut request = OptimizeRequest::default();
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ImageError::InvalidField {
            field: "form",
            message: e.to_string(),
        }
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                file = Some(field.bytes().await.map_err(|e| ImageError::InvalidField {
                    field: "file",
                    message: e.to_string(),
                })?);
            }
            "width" => {
                request.width = parse_dimension("width", &field_text(field, "width").await?)?;
            }
            "height" => {
                request.height = parse_dimension("height", &field_text(field, "height").await?)?;
            }
            "quality" => request.quality = parse_quality(&field_text(field, "quality").await?)?,
            "fit" => {
                let raw = field_text(field, "fit").await?;
                request.fit = FitMode::from_name(raw.trim()).ok_or(ImageError::InvalidField {
                    field: "fit",
                    message: format!("'{}' is not a supported fit mode", raw.trim()),
                })?;
            }
            "format" => {
                let raw = field_text(field, "format").await?;
                request.format =
                    OutputFormat::from_name(raw.trim()).ok_or(ImageError::InvalidField {
                        field: "format",
                        message: format!("'{}' is not a supported output format", raw.trim()),
                    })?;
            }
            _ => {}
        }
    }

    let file = file.ok_or(ImageError::MissingFile)?;
    let data = state.optimizer.optimize(&file, &request)?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, request.format.content_type())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}, immutable", state.cache_max_age),
        )
        .body(Body::from(data))
        .unwrap();

    Ok(response)
}

async fn field_text(
    field: axum::extract::multipart::Field<'_>,
    name: &'static str,
) -> Result<String, ImageError> {
    field.text().await.map_err(|e| ImageError::InvalidField {
        field: name,
        message: e.to_string(),
    })
}

fn parse_dimension(field: &'static str, raw: &str) -> Result<u32, ImageError> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ImageError::InvalidField {
            field,
            message: format!("'{}' is not a number", raw.trim()),
        })?;

    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        return Err(ImageError::InvalidField {
            field,
            message: format!("must be between {MIN_DIMENSION} and {MAX_DIMENSION}"),
        });
    }

    Ok(value)
}

fn parse_quality(raw: &str) -> Result<u8, ImageError> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| ImageError::InvalidField {
            field: "quality",
            message: format!("'{}' is not a number", raw.trim()),
        })?;

    if !(MIN_QUALITY..=MAX_QUALITY).contains(&value) {
        return Err(ImageError::InvalidField {
            field: "quality",
            message: format!("must be between {MIN_QUALITY} and {MAX_QUALITY}"),
        });
    }

    Ok(value)
}

// =============================================================================
// Username Scan API
// =============================================================================

/// Handle streaming username scan requests.
///
/// # Endpoint
///
/// `GET /api/v1/usernames/{username}`
///
/// # Path Parameters
///
/// - `username`: Scan target, 1-64 characters
///
/// # Response
///
/// - `200 OK`: `application/x-ndjson` body; each line is one JSON event,
///   either a platform result or `{"error": "..."}`. Events are forwarded
///   as the scanner produces them; the response has no Content-Length.
/// - `400 Bad Request`: Username fails validation (no process is spawned)
/// - `500 Internal Server Error`: The scanner could not be launched
///
/// Disconnecting mid-stream kills the scanner process.
pub async fn scan_usernames_handler<S: Scanner>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<Response, ScanError> {
    let request = ScanRequest::new(username)?;
    let handle = state.scanner.spawn(&request).await?;

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(relay::run(handle, tx, cancel.clone()));

    // The guard travels with the body stream: dropping the response mid-flight
    // cancels the token and the relay kills the scanner.
    let guard = cancel.drop_guard();
    let stream = futures::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let chunk = rx.recv().await?;
        Some((Ok::<_, Infallible>(chunk), (rx, guard)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(stream))
        .unwrap();

    Ok(response)
}

// =============================================================================
// Tests
// =============================================================================
