use std::path::PathBuf;

use thiserror::Error;

/// Every failure the customizer can produce, client and server side.
///
/// The client variants display their raw message so the user-facing alert
/// can prefix it verbatim. The server variants display the plain-text body
/// sent back to the browser.
#[derive(Debug, Error)]
pub enum CustomizerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Non-success response; `message` is the response body.
    #[error("{message}")]
    StatusError { status: u16, message: String },

    #[error("{0}")]
    TransportError(String),

    #[error("{0}")]
    BodyError(String),

    #[error("{0}")]
    ResourceError(String),

    #[error("Base image not found on server.")]
    BaseImageMissing(PathBuf),

    #[error("Uploaded image must be square (width equals height).")]
    PhotoNotSquare { width: u32, height: u32 },

    #[error("Error processing uploaded image: {0}")]
    PhotoError(String),

    #[error("Uploaded image is too large.")]
    UploadTooLarge { limit: usize },

    #[error("Invalid form submission: {0}")]
    FormError(String),

    #[error("No usable font for card text: {0}")]
    FontError(String),

    #[error("{0}")]
    ImageError(String),

    #[error("{0}")]
    InternalError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CustomizerError {
    /// HTTP status the server answers with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            CustomizerError::StatusError { status, .. } => *status,
            CustomizerError::PhotoNotSquare { .. }
            | CustomizerError::PhotoError(_)
            | CustomizerError::FormError(_) => 400,
            CustomizerError::UploadTooLarge { .. } => 413,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, CustomizerError>;
