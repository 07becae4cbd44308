//! Image optimization layer.
//!
//! Thin service over the `image` crate: decode an upload, resize it honoring
//! a fit mode without ever enlarging, and re-encode it in the requested
//! format. The HTTP layer validates form fields; this layer owns the pixel
//! work.
//!
//! # Components
//!
//! - [`ImageOptimizer`]: decode → resize → encode pipeline
//! - [`OptimizeRequest`]: target dimensions, quality, fit and format
//! - [`FitMode`] / [`OutputFormat`]: the accepted form-field vocabularies

pub mod optimizer;

pub use optimizer::{
    FitMode, ImageOptimizer, OptimizeRequest, OutputFormat, DEFAULT_DIMENSION, DEFAULT_QUALITY,
    MAX_DIMENSION, MAX_QUALITY, MIN_DIMENSION, MIN_QUALITY,
};
