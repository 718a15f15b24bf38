use thiserror::Error;

/// Errors that can occur while sketching or exporting
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Snapshot of {bytes} bytes exceeds the capture limit of {limit} bytes")]
    SnapshotTooLarge { bytes: usize, limit: usize },

    #[error("Failed to allocate {bytes} bytes for a snapshot")]
    SnapshotAlloc { bytes: usize },

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),

    #[error("Invalid background pattern: {0:?}")]
    InvalidPattern(String),

    #[error("Failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;
