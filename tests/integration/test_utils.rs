//! Test utilities for integration tests.
//!
//! This module provides scanner doubles and helpers for building multipart
//! bodies and collecting NDJSON responses.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;

use web_toolbox::error::ScanError;
use web_toolbox::scan::{ScanHandle, ScanRequest, Scanner, Terminate};

// =============================================================================
// Scanner Doubles
// =============================================================================

/// Terminator double that records whether terminate() was invoked.
pub struct SpyTerminator {
    killed: Arc<AtomicBool>,
}

impl Terminate for SpyTerminator {
    fn terminate(&mut self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// Scanner double that replays canned stdout/stderr and records spawns.
pub struct FakeScanner {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    spawn_count: Arc<AtomicUsize>,
    last_username: Arc<Mutex<Option<String>>>,
    killed: Arc<AtomicBool>,
}

impl FakeScanner {
    pub fn new(stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: stdout.to_vec(),
            stderr: stderr.to_vec(),
            spawn_count: Arc::new(AtomicUsize::new(0)),
            last_username: Arc::new(Mutex::new(None)),
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn spawn_count(&self) -> Arc<AtomicUsize> {
        self.spawn_count.clone()
    }

    pub fn last_username(&self) -> Arc<Mutex<Option<String>>> {
        self.last_username.clone()
    }
}

#[async_trait]
impl Scanner for FakeScanner {
    async fn spawn(&self, request: &ScanRequest) -> Result<ScanHandle, ScanError> {
        self.spawn_count.fetch_add(1, Ordering::SeqCst);
        *self.last_username.lock().unwrap() = Some(request.username().to_string());

        Ok(ScanHandle {
            stdout: Box::new(Cursor::new(self.stdout.clone())),
            stderr: Box::new(Cursor::new(self.stderr.clone())),
            terminator: Box::new(SpyTerminator {
                killed: self.killed.clone(),
            }),
        })
    }
}

/// Scanner double whose pipes never produce data or close.
///
/// The paired write halves are leaked so the read halves stay pending until
/// the relay is cancelled. They must outlive the scanner itself: `create_router`
/// moves the scanner into an `Arc`, and `oneshot` drops the router (and thus the
/// scanner) as soon as it produces the response — so parking the writers inside
/// the scanner would close them early, EOF the read pipes, and let the relay
/// drain to completion without ever exercising the cancel-on-disconnect path.
pub struct PendingScanner {
    killed: Arc<AtomicBool>,
}

impl PendingScanner {
    pub fn new() -> Self {
        Self {
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn killed(&self) -> Arc<AtomicBool> {
        self.killed.clone()
    }
}

#[async_trait]
impl Scanner for PendingScanner {
    async fn spawn(&self, _request: &ScanRequest) -> Result<ScanHandle, ScanError> {
        let (stdout_writer, stdout) = tokio::io::duplex(64);
        let (stderr_writer, stderr) = tokio::io::duplex(64);

        // Leak the write halves so the read pipes never reach EOF; only
        // cancellation ends the relay. See the type's doc comment for why these
        // cannot simply be parked inside the scanner.
        std::mem::forget(stdout_writer);
        std::mem::forget(stderr_writer);

        Ok(ScanHandle {
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            terminator: Box::new(SpyTerminator {
                killed: self.killed.clone(),
            }),
        })
    }
}

/// Scanner double that always fails to spawn.
pub struct BrokenScanner;

#[async_trait]
impl Scanner for BrokenScanner {
    async fn spawn(&self, _request: &ScanRequest) -> Result<ScanHandle, ScanError> {
        Err(ScanError::Spawn("No such file or directory".to_string()))
    }
}

// =============================================================================
// Body Helpers
// =============================================================================

/// Collect a response body and parse every NDJSON line.
pub async fn collect_ndjson(response: Response) -> Vec<serde_json::Value> {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();

    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Collect a response body as bytes.
pub async fn collect_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body as a UTF-8 string.
pub async fn collect_text(response: Response) -> String {
    String::from_utf8(collect_bytes(response).await).unwrap()
}

// =============================================================================
// Multipart Helpers
// =============================================================================

/// Boundary used by [`multipart_body`].
pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Content-Type header value for [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// Build a multipart/form-data body from text fields plus an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Body {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = file {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

// =============================================================================
// Image Helpers
// =============================================================================

/// Encode a small solid-color PNG for upload tests.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Decode an image response body.
pub fn decode_image(data: &[u8]) -> image::DynamicImage {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap()
}
