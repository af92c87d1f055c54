//! Error types for the capture engine

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a capture session
#[derive(Error, Debug)]
pub enum Error {
    /// Segmentation yielded no blocks; the session cannot start
    #[error("No content blocks detected")]
    NoContentFound,

    /// Merge requested with fewer than two marked blocks
    #[error("Need at least 2 marked blocks to merge, got {0}")]
    InvalidMergeRange(usize),

    /// Merge requested over a non-adjacent set of blocks
    #[error("Can only merge adjacent blocks")]
    NonContiguousMerge,

    /// Unmerge requested but no marked block is a merged block
    #[error("No merged block is marked for unmerge")]
    NoMergedBlockMarked,

    /// The rasterizer failed to render a block
    #[error("Rendering failed: {0}")]
    RenderFailure(String),

    /// The composed image could not be handed off (encoded or written)
    #[error("Failed to write capture output: {0}")]
    DownloadFailure(String),
}
