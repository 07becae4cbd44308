//! Image optimizer.
//!
//! This module decodes an uploaded image, resizes it according to a fit
//! mode, and re-encodes it in the requested output format.
//!
//! # Design Decisions
//!
//! - **Always decode/encode**: uploads are always decoded to pixels and
//!   re-encoded, even when source and target format match. No passthrough.
//!
//! - **Never enlarge**: a target larger than the source in both dimensions
//!   leaves the image at its native size; only downscaling is performed.
//!
//! - **Quality control**: quality is honored for JPEG output; other codecs
//!   encode at their defaults.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::ImageError;

/// Minimum target dimension in pixels.
pub const MIN_DIMENSION: u32 = 1;

/// Maximum target dimension in pixels.
pub const MAX_DIMENSION: u32 = 4096;

/// Default target dimension in pixels.
pub const DEFAULT_DIMENSION: u32 = 64;

/// Minimum encoding quality.
pub const MIN_QUALITY: u8 = 1;

/// Maximum encoding quality.
pub const MAX_QUALITY: u8 = 100;

/// Default encoding quality.
pub const DEFAULT_QUALITY: u8 = 64;

// =============================================================================
// Request Vocabulary
// =============================================================================

/// How the image is mapped onto the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Preserve aspect ratio, fit entirely within the target box
    #[default]
    Contain,

    /// Preserve aspect ratio, cover the target box, crop the overflow
    Cover,

    /// Ignore aspect ratio, match the target box exactly
    Fill,

    /// Same as contain
    Inside,

    /// Preserve aspect ratio, make both dimensions at least the target
    Outside,
}

impl FitMode {
    /// Parse a form-field value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "contain" => Some(FitMode::Contain),
            "cover" => Some(FitMode::Cover),
            "fill" => Some(FitMode::Fill),
            "inside" => Some(FitMode::Inside),
            "outside" => Some(FitMode::Outside),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FitMode::Contain => "contain",
            FitMode::Cover => "cover",
            FitMode::Fill => "fill",
            FitMode::Inside => "inside",
            FitMode::Outside => "outside",
        }
    }
}

/// Output encoding for the optimized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// Parse a form-field value. Accepts the common extension aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "png" => Some(OutputFormat::Png),
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "webp" => Some(OutputFormat::Webp),
            "gif" => Some(OutputFormat::Gif),
            "bmp" => Some(OutputFormat::Bmp),
            "tiff" | "tif" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    /// MIME type for HTTP responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Tiff => "image/tiff",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Parameters for one optimization.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    /// Target width in pixels (1-4096)
    pub width: u32,

    /// Target height in pixels (1-4096)
    pub height: u32,

    /// Encoding quality (1-100, JPEG only)
    pub quality: u8,

    /// Fit mode for the resize
    pub fit: FitMode,

    /// Output encoding
    pub format: OutputFormat,
}

impl Default for OptimizeRequest {
    fn default() -> Self {
        Self {
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            quality: DEFAULT_QUALITY,
            fit: FitMode::default(),
            format: OutputFormat::default(),
        }
    }
}

// =============================================================================
// Optimizer
// =============================================================================

/// Decode → resize → encode pipeline for uploaded images.
#[derive(Debug, Clone, Default)]
pub struct ImageOptimizer {
    // Currently stateless, but struct allows future extension
    // (e.g., shared thread pool, encoder settings)
}

impl ImageOptimizer {
    pub fn new() -> Self {
        Self {}
    }

    /// Optimize an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source is empty
    /// - The source cannot be decoded as an image
    /// - Encoding in the requested format fails
    pub fn optimize(&self, source: &[u8], request: &OptimizeRequest) -> Result<Bytes, ImageError> {
        if source.is_empty() {
            return Err(ImageError::EmptyFile);
        }

        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        let resized = resize_to_fit(img, request.width, request.height, request.fit);
        encode(resized, request)
    }
}

/// Resize an image onto the target box, never enlarging.
fn resize_to_fit(img: DynamicImage, width: u32, height: u32, fit: FitMode) -> DynamicImage {
    let (src_w, src_h) = (img.width(), img.height());

    if width >= src_w && height >= src_h {
        return img;
    }

    match fit {
        FitMode::Contain | FitMode::Inside => img.resize(width, height, FilterType::Lanczos3),
        FitMode::Cover => img.resize_to_fill(width, height, FilterType::Lanczos3),
        FitMode::Fill => img.resize_exact(width, height, FilterType::Lanczos3),
        FitMode::Outside => {
            let scale = f64::max(
                width as f64 / src_w as f64,
                height as f64 / src_h as f64,
            );
            let new_w = ((src_w as f64 * scale).round() as u32).max(1);
            let new_h = ((src_h as f64 * scale).round() as u32).max(1);
            img.resize_exact(new_w, new_h, FilterType::Lanczos3)
        }
    }
}

/// Encode pixels in the requested output format.
fn encode(img: DynamicImage, request: &OptimizeRequest) -> Result<Bytes, ImageError> {
    let mut output = Cursor::new(Vec::new());

    match request.format {
        OutputFormat::Jpeg => {
            let quality = request.quality.clamp(MIN_QUALITY, MAX_QUALITY);
            // JPEG has no alpha channel
            let img = DynamicImage::ImageRgb8(img.to_rgb8());
            let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
            encoder
                .encode_image(&img)
                .map_err(|e| ImageError::Encode(e.to_string()))?;
        }
        OutputFormat::Gif | OutputFormat::Webp => {
            // These codecs only accept RGBA input
            let img = DynamicImage::ImageRgba8(img.to_rgba8());
            img.write_to(&mut output, request.format.image_format())
                .map_err(|e| ImageError::Encode(e.to_string()))?;
        }
        _ => {
            img.write_to(&mut output, request.format.image_format())
                .map_err(|e| ImageError::Encode(e.to_string()))?;
        }
    }

    Ok(Bytes::from(output.into_inner()))
}

// =============================================================================
// Tests
// =============================================================================
