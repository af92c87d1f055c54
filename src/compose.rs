//! Composer: packs rasterized block buffers into one output image.
//!
//! Three layouts:
//! - vertical stacking (vertical capture mode),
//! - greedy shortest-column masonry (horizontal mode, uniform widths),
//! - row-flow (horizontal mode fallback when buffer widths vary).
//!
//! Every layout returns `None` for an empty buffer list — "nothing to
//! compose" is a distinct non-failure condition, never a zero-area image.

use image::{imageops, Rgba, RgbaImage};

use crate::raster::RasterBuffer;
use crate::session::CaptureMode;
use crate::CaptureConfig;

/// Terminal artifact of a capture: the composed pixels plus the suggested
/// output filename.
#[derive(Debug, Clone)]
pub struct CompositeImage {
    pub image: RgbaImage,
    pub filename: String,
}

/// Compose buffers according to the session mode. Horizontal mode uses
/// masonry for uniform-width buffers and falls back to row-flow when widths
/// differ.
pub fn compose(
    buffers: &[RasterBuffer],
    mode: CaptureMode,
    cfg: &CaptureConfig,
    background: Rgba<u8>,
) -> Option<RgbaImage> {
    match mode {
        CaptureMode::Vertical => stack_vertical(buffers, cfg, background),
        CaptureMode::Horizontal => {
            let uniform = buffers
                .windows(2)
                .all(|w| w[0].width() == w[1].width());
            if uniform {
                masonry_horizontal(buffers, cfg, background)
            } else {
                flow_rows(buffers, cfg, background)
            }
        }
    }
}

/// Stack buffers top to bottom, left-aligned at the padding edge.
pub fn stack_vertical(
    buffers: &[RasterBuffer],
    cfg: &CaptureConfig,
    background: Rgba<u8>,
) -> Option<RgbaImage> {
    if buffers.is_empty() {
        return None;
    }
    let gap = cfg.vertical_gap;
    let max_width = buffers.iter().map(RasterBuffer::width).max().unwrap_or(0);
    let width = max_width + cfg.padding * 2;
    let heights: u32 = buffers.iter().map(RasterBuffer::height).sum();
    let height = cfg.padding * 2 + heights + gap * (buffers.len() as u32 - 1);

    let mut canvas = RgbaImage::from_pixel(width, height, background);
    let mut y = cfg.padding;
    for buf in buffers {
        imageops::replace(&mut canvas, buf.image(), cfg.padding.into(), y.into());
        y += buf.height() + gap;
    }
    Some(canvas)
}

/// Greedy shortest-column masonry.
///
/// All buffers are treated as sharing one column width; buffers narrower
/// than the widest are left-aligned within their column. Each buffer lands
/// in the currently shortest column (ties to the lowest index). This favors
/// balanced column heights over minimal area and runs in O(n·k).
pub fn masonry_horizontal(
    buffers: &[RasterBuffer],
    cfg: &CaptureConfig,
    background: Rgba<u8>,
) -> Option<RgbaImage> {
    if buffers.is_empty() {
        return None;
    }
    let col_width = buffers.iter().map(RasterBuffer::width).max().unwrap_or(0);
    let columns = column_count(buffers.len(), col_width, cfg);

    let mut col_heights = vec![cfg.padding; columns];
    let mut placements = Vec::with_capacity(buffers.len());
    for buf in buffers {
        let col = col_heights
            .iter()
            .enumerate()
            .min_by_key(|&(_, h)| *h)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let x = cfg.padding + col as u32 * (col_width + cfg.block_gap);
        let y = col_heights[col];
        placements.push((buf, x, y));
        col_heights[col] = y + buf.height() + cfg.block_gap;
    }

    let width = cfg.padding * 2 + columns as u32 * col_width + (columns as u32 - 1) * cfg.block_gap;
    let tallest = col_heights.iter().copied().max().unwrap_or(cfg.padding);
    let height = tallest.saturating_sub(cfg.block_gap) + cfg.padding;

    let mut canvas = RgbaImage::from_pixel(width, height, background);
    for (buf, x, y) in placements {
        imageops::replace(&mut canvas, buf.image(), x.into(), y.into());
    }
    Some(canvas)
}

/// Columns that fit the configured row width, at least 2, at most one per
/// buffer.
fn column_count(buffers: usize, col_width: u32, cfg: &CaptureConfig) -> usize {
    let usable = cfg.max_row_width.saturating_sub(cfg.padding * 2) + cfg.block_gap;
    let fit = (usable / (col_width + cfg.block_gap)) as usize;
    fit.min(buffers).max(2)
}

/// Row-flow layout for variable-width buffers: fill a row left to right,
/// wrap when the next buffer would overflow the row width, stack rows.
pub fn flow_rows(
    buffers: &[RasterBuffer],
    cfg: &CaptureConfig,
    background: Rgba<u8>,
) -> Option<RgbaImage> {
    if buffers.is_empty() {
        return None;
    }
    let limit = cfg.max_row_width.saturating_sub(cfg.padding);

    // Place buffers first, sizing the canvas afterwards.
    let mut placements: Vec<(&RasterBuffer, u32, u32)> = Vec::with_capacity(buffers.len());
    let mut x = cfg.padding;
    let mut y = cfg.padding;
    let mut row_height = 0u32;
    let mut widest_row = 0u32;

    for buf in buffers {
        if x > cfg.padding && x + buf.width() > limit {
            // wrap
            y += row_height + cfg.row_gap;
            x = cfg.padding;
            row_height = 0;
        }
        placements.push((buf, x, y));
        x += buf.width() + cfg.block_gap;
        widest_row = widest_row.max(x.saturating_sub(cfg.block_gap));
        row_height = row_height.max(buf.height());
    }

    let width = widest_row + cfg.padding;
    let height = y + row_height + cfg.padding;
    let mut canvas = RgbaImage::from_pixel(width, height, background);
    for (buf, px, py) in placements {
        imageops::replace(&mut canvas, buf.image(), px.into(), py.into());
    }
    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BG: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const INK: Rgba<u8> = Rgba([10, 10, 10, 255]);

    fn buf(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::solid(width, height, INK)
    }

    fn cfg() -> CaptureConfig {
        CaptureConfig::default()
    }

    #[test]
    fn vertical_stack_dimensions_match_the_arithmetic() {
        let cfg = CaptureConfig {
            padding: 20,
            vertical_gap: 2,
            ..cfg()
        };
        let out = stack_vertical(&[buf(300, 100), buf(300, 150)], &cfg, BG).unwrap();
        assert_eq!(out.height(), 292); // 20*2 + 100 + 150 + 2
        assert_eq!(out.width(), 340); // 300 + 40
    }

    #[test]
    fn masonry_balances_two_columns() {
        let cfg = CaptureConfig {
            max_row_width: 700,
            block_gap: 10,
            padding: 20,
            ..cfg()
        };
        let buffers: Vec<_> = (0..4).map(|_| buf(300, 100)).collect();
        let out = masonry_horizontal(&buffers, &cfg, BG).unwrap();
        // k = max(2, min(4, (700-40+10)/310)) = 2; both columns reach
        // 20 + 2*(100+10) = 240; height = 240 - 10 + 20
        assert_eq!(out.width(), 650); // 40 + 2*300 + 10
        assert_eq!(out.height(), 250);
    }

    #[test]
    fn masonry_ties_break_to_the_lowest_column() {
        let cfg = CaptureConfig {
            max_row_width: 700,
            block_gap: 10,
            padding: 20,
            ..cfg()
        };
        // Equal heights tie on the first placement; the tie goes to
        // column 0, so the second buffer opens column 1.
        let buffers: Vec<_> = (0..2).map(|_| buf(300, 50)).collect();
        let out = masonry_horizontal(&buffers, &cfg, BG).unwrap();
        // one row of two columns: height = 20 + 50 + 10 - 10 + 20
        assert_eq!(out.height(), 90);
    }

    #[test]
    fn masonry_prefers_shortest_column() {
        let cfg = CaptureConfig {
            max_row_width: 700,
            block_gap: 10,
            padding: 20,
            ..cfg()
        };
        // tall, short, short: the two short buffers should share column 1.
        let buffers = [buf(300, 400), buf(300, 100), buf(300, 100)];
        let out = masonry_horizontal(&buffers, &cfg, BG).unwrap();
        // col0 = 20+400+10 = 430; col1 = 20+100+10+100+10 = 240
        assert_eq!(out.height(), 430 - 10 + 20);
    }

    #[test]
    fn empty_input_is_the_nothing_to_compose_sentinel() {
        let cfg = cfg();
        assert!(stack_vertical(&[], &cfg, BG).is_none());
        assert!(masonry_horizontal(&[], &cfg, BG).is_none());
        assert!(flow_rows(&[], &cfg, BG).is_none());
    }

    #[test]
    fn flow_rows_wraps_when_the_row_is_full() {
        let cfg = CaptureConfig {
            max_row_width: 700,
            block_gap: 10,
            row_gap: 20,
            padding: 20,
            ..cfg()
        };
        // 20 + 300 + 10 + 300 = 630 fits; third buffer wraps.
        let buffers = [buf(300, 100), buf(300, 120), buf(300, 80)];
        let out = flow_rows(&buffers, &cfg, BG).unwrap();
        // rows: h=120 then h=80; height = 20 + 120 + 20 + 80 + 20
        assert_eq!(out.height(), 260);
        // widest row: 20 + 300 + 10 + 300 = 630; width = 630 + 20
        assert_eq!(out.width(), 650);
    }

    #[test]
    fn horizontal_compose_dispatches_on_width_uniformity() {
        let cfg = CaptureConfig {
            max_row_width: 700,
            block_gap: 10,
            row_gap: 20,
            padding: 20,
            ..cfg()
        };
        let uniform = [buf(300, 100), buf(300, 100)];
        let varied = [buf(300, 100), buf(200, 100)];
        let m = compose(&uniform, CaptureMode::Horizontal, &cfg, BG).unwrap();
        let f = compose(&varied, CaptureMode::Horizontal, &cfg, BG).unwrap();
        assert_eq!(m.width(), 650); // masonry: two 300px columns
        assert_eq!(f.width(), 550); // row-flow: 20 + 300 + 10 + 200 + 20
    }
}
