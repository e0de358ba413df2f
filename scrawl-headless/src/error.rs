//! Errors raised while preparing a headless run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading scripts, configs and clipboard
/// fixtures.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A script or config file is not valid JSON for its schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The clipboard fixture image could not be decoded.
    #[error("failed to decode clipboard image {path}: {source}")]
    Image {
        /// The image that failed.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },
}
