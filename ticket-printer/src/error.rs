//! Error types for the ticket printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Source image cannot be turned into a raster block
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Invalid printer or job configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// OS print spooler rejected the raw job
    #[error("Spooler error: {0}")]
    Spooler(String),

    /// A copy in a multi-copy job failed
    #[error("Copy {copy} failed: {source}")]
    CopyFailed {
        /// 1-based copy number
        copy: u32,
        #[source]
        source: Box<PrintError>,
    },
}

impl PrintError {
    pub(crate) fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
