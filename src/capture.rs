//! Capture pipeline: rasterize the selected blocks sequentially and compose
//! them into the output artifact.
//!
//! Rasterization is strictly sequential — buffers are composed in selection
//! order and the rasterizer's scratch state is reused between blocks. The
//! cancel token is checked before each block; a render failure aborts the
//! whole capture with the partial buffers dropped.

use chrono::{DateTime, Local};
use scraper::Html;

use crate::block::Block;
use crate::compose::{compose, CompositeImage};
use crate::raster::{CancelToken, RasterBuffer, Rasterizer};
use crate::rendering::detect_background;
use crate::session::CaptureSession;
use crate::{CaptureConfig, Result};

/// How a capture run ended.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The composed image, ready for handoff
    Image(CompositeImage),
    /// The cancel token was set before every block was rendered; no output
    Cancelled,
    /// The selection was empty; nothing to compose, not a failure
    NothingSelected,
}

/// Shared per-session target width: the widest natural block width, padded,
/// clamped to the configured bounds.
pub fn capture_width(
    doc: &Html,
    blocks: &[&Block],
    rasterizer: &dyn Rasterizer,
    cfg: &CaptureConfig,
) -> u32 {
    let natural = blocks
        .iter()
        .copied()
        .map(|b| rasterizer.natural_width(doc, b))
        .max()
        .unwrap_or(0);
    (natural + cfg.width_padding).clamp(cfg.min_capture_width, cfg.max_capture_width)
}

/// Suggested output filename for a capture taken at `when`.
pub fn output_filename(platform: &str, when: DateTime<Local>) -> String {
    format!("{}_{}.png", platform, when.format("%Y%m%d_%H%M%S"))
}

/// Run a full capture over the session's current selection.
///
/// Errors out on the first render failure (fail-fast, partial buffers
/// dropped). Cancellation is cooperative: the in-flight block finishes, no
/// further block is rendered.
pub fn run_capture(
    doc: &Html,
    session: &CaptureSession,
    platform: &str,
    rasterizer: &mut dyn Rasterizer,
    cfg: &CaptureConfig,
    cancel: &CancelToken,
) -> Result<CaptureOutcome> {
    let blocks: Vec<&Block> = session.selected_blocks().collect();
    if blocks.is_empty() {
        log::info!("capture requested with empty selection");
        return Ok(CaptureOutcome::NothingSelected);
    }

    let target_width = capture_width(doc, &blocks, rasterizer, cfg);
    log::debug!(
        "capturing {} block(s) at {}px ({:?})",
        blocks.len(),
        target_width,
        session.mode()
    );

    let mut buffers: Vec<RasterBuffer> = Vec::with_capacity(blocks.len());
    for (i, &block) in blocks.iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("capture cancelled after {} of {} block(s)", i, blocks.len());
            return Ok(CaptureOutcome::Cancelled);
        }
        log::debug!("rasterizing block {}/{}", i + 1, blocks.len());
        buffers.push(rasterizer.render(doc, block, target_width)?);
    }
    if cancel.is_cancelled() {
        return Ok(CaptureOutcome::Cancelled);
    }

    let background = detect_background(doc);
    let image = match compose(&buffers, session.mode(), cfg, background) {
        Some(image) => image,
        None => return Ok(CaptureOutcome::NothingSelected),
    };
    drop(buffers);

    Ok(CaptureOutcome::Image(CompositeImage {
        image,
        filename: output_filename(platform, Local::now()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_carries_platform_and_timestamp() {
        let when = Local.with_ymd_and_hms(2026, 8, 26, 9, 5, 7).unwrap();
        assert_eq!(
            output_filename("deepseek", when),
            "deepseek_20260826_090507.png"
        );
    }
}
