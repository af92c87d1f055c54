//! ChatShot Capture Engine
//!
//! Segments an AI chat response (parsed HTML) into logical visual blocks,
//! tracks a select/merge/unmerge state machine over them, rasterizes the
//! selected blocks at a shared width and packs the buffers into one
//! composite image (vertical stack or shortest-column masonry).
//!
//! # Features
//!
//! - **Site adapters**: per-platform markup rules behind one trait,
//!   selected by host lookup
//! - **Pluggable rasterizer**: the crate ships a deterministic text-metric
//!   renderer; callers can plug a real one
//! - **Cooperative cancellation**: a session-scoped token checked between
//!   blocks
//!
//! # Example
//!
//! ```no_run
//! use chatshot::{adapter, capture, segment, CancelToken, CaptureConfig,
//!                CaptureMode, CaptureSession, TextRasterizer};
//! use chatshot::rendering::detect_background;
//! use scraper::Html;
//!
//! # fn main() -> chatshot::Result<()> {
//! let doc = Html::parse_document("...page html...");
//! let site = adapter::adapter_for_host("chat.deepseek.com");
//! let responses = site.responses(&doc);
//! let blocks = segment::segment(site, responses[responses.len() - 1]);
//!
//! let mut session = CaptureSession::new(blocks, CaptureMode::Horizontal)?;
//! session.toggle_merge_mark(0);
//! session.toggle_merge_mark(1);
//! session.merge()?;
//!
//! let cfg = CaptureConfig::default();
//! let mut rasterizer = TextRasterizer::new(detect_background(&doc));
//! let outcome = capture::run_capture(
//!     &doc, &session, site.name(), &mut rasterizer, &cfg, &CancelToken::new(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod block;
pub mod capture;
pub mod compose;
pub mod error;
pub mod raster;
pub mod rendering;
pub mod segment;
pub mod session;

pub use block::{Block, BlockKind};
pub use capture::{run_capture, CaptureOutcome};
pub use compose::CompositeImage;
pub use error::{Error, Result};
pub use raster::{CancelToken, RasterBuffer, Rasterizer};
pub use rendering::TextRasterizer;
pub use session::{CaptureMode, CaptureSession};

/// Layout tunables for rasterization and composition.
///
/// The defaults are the engine's fixed tuning; there is no config file.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Widest the packed output may grow before masonry stops adding columns
    pub max_row_width: u32,
    /// Gap between blocks inside masonry columns and row-flow rows
    pub block_gap: u32,
    /// Gap between row-flow rows
    pub row_gap: u32,
    /// Outer padding around the composed image
    pub padding: u32,
    /// Gap between vertically stacked blocks
    pub vertical_gap: u32,
    /// Lower bound for the shared capture width
    pub min_capture_width: u32,
    /// Upper bound for the shared capture width (keeps code blocks sane)
    pub max_capture_width: u32,
    /// Padding added to the widest natural block width before clamping
    pub width_padding: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_row_width: 3000,
            block_gap: 10,
            row_gap: 20,
            padding: 20,
            vertical_gap: 2,
            min_capture_width: 400,
            max_capture_width: 1200,
            width_padding: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_the_layout_constants() {
        let cfg = CaptureConfig::default();
        assert_eq!(cfg.max_row_width, 3000);
        assert_eq!(cfg.block_gap, 10);
        assert_eq!(cfg.padding, 20);
        assert_eq!(cfg.min_capture_width, 400);
        assert_eq!(cfg.max_capture_width, 1200);
    }
}
