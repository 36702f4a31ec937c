//! Error types for the editor core.
//!
//! Rejected user input (adding a point with no active group, clicking outside
//! the canvas) is not an error and never shows up here.

use thiserror::Error;

/// Failure writing to or reading from the snapshot store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },
}

/// Fatal failure during the per-frame update pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("group {id} has {points} points but {controls} controls")]
    MalformedGroup {
        id: String,
        points: usize,
        controls: usize,
    },

    #[error("non-finite coordinate in {context}")]
    NonFinite { context: String },
}

/// Failure decoding a reference image payload.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image payload is not a base64 data URL")]
    NotDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}
