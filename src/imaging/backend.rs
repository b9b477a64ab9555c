//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations the resizer needs:
//! reading dimensions and writing a scaled JPEG. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, scale to the exact requested size and encode as JPEG.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
