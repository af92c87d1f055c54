//! Rasterization surface: pixel buffers, the rasterizer capability and the
//! cooperative cancellation token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use scraper::Html;

use crate::block::Block;
use crate::error::Result;

/// Rendered pixels for one block.
///
/// Produced by a [`Rasterizer`], consumed exactly once by the composer.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// A buffer filled with one color. Used by tests and as a fallback for
    /// elements that produce no text.
    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Capability that turns one block into pixels at a fixed width.
///
/// The width is shared by every block of a session (computed once from the
/// widest block, clamped to the configured bounds); the height is content
/// determined. Implementations must be deterministic for a given document.
/// A failure aborts the whole capture: the pipeline is fail-fast and never
/// produces partial output.
pub trait Rasterizer {
    fn render(&mut self, doc: &Html, block: &Block, target_width: u32) -> Result<RasterBuffer>;

    /// Estimated unpadded width the block would naturally occupy. Feeds the
    /// session-wide width clamp; the default reports a nominal measure so
    /// the clamp lands on the configured minimum.
    fn natural_width(&self, _doc: &Html, _block: &Block) -> u32 {
        0
    }
}

/// Session-scoped cooperative cancellation flag.
///
/// Cloned tokens share the flag. The capture loop checks it before each
/// block; in-flight work finishes, later blocks are never rendered, and the
/// capture ends in a cancelled state with no output. Advisory only — there
/// is no preemption and no timeout.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
