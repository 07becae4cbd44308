use thiserror::Error;

/// Errors from the username scan pipeline
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// Username failed validation (must be 1-64 characters)
    #[error("Invalid username: expected 1-64 characters, got {length}")]
    InvalidUsername { length: usize },

    /// The external scanner process could not be spawned
    #[error("Failed to launch scanner: {0}")]
    Spawn(String),

    /// The spawned process was missing a requested pipe
    #[error("Scanner process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Errors from the image optimization pipeline
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// The upload did not include a file part
    #[error("File was not found. Please upload a file and try again.")]
    MissingFile,

    /// The uploaded file had no content
    #[error("File is empty. Please upload a non-empty file and try again.")]
    EmptyFile,

    /// A form field was missing or out of range
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// The uploaded bytes could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The image could not be re-encoded in the requested format
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl ImageError {
    /// Whether this error is the caller's fault (maps to a 400-class status).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ImageError::Encode(_))
    }
}
