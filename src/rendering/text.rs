//! Deterministic text-metric rasterizer.
//!
//! Renders a block without a browser: text is measured with a fixed 8 px
//! character cell, wrapped to the target width, and painted as one solid
//! rect per line (headings at 2x scale, preformatted text in a shaded box).
//! Good enough for layout math, goldens and CLI output; not a styling
//! engine.

use image::{Rgba, RgbaImage};
use scraper::{ElementRef, Html};

use crate::block::{resolve, Block};
use crate::error::{Error, Result};
use crate::raster::{RasterBuffer, Rasterizer};

/// Width and height of one character cell at scale 1
const CHAR_CELL: u32 = 8;
/// Inner padding around a rendered block
const INNER_PADDING: u32 = 16;
/// Vertical spacing between elements of one block
const ELEMENT_SPACING: u32 = 6;
/// Nominal measure (in characters) for flowing text when estimating the
/// natural width of a block
const PARAGRAPH_MEASURE: usize = 96;

/// Built-in [`Rasterizer`] implementation.
pub struct TextRasterizer {
    background: Rgba<u8>,
    foreground: Rgba<u8>,
    code_shade: Rgba<u8>,
}

impl TextRasterizer {
    /// Foreground and code-box colors are derived from the background so
    /// dark and light captures both stay readable.
    pub fn new(background: Rgba<u8>) -> Self {
        let dark_page = background.0[0] < 128;
        let (foreground, code_shade) = if dark_page {
            (Rgba([200, 200, 200, 255]), Rgba([45, 45, 45, 255]))
        } else {
            (Rgba([60, 60, 60, 255]), Rgba([235, 235, 235, 255]))
        };
        Self {
            background,
            foreground,
            code_shade,
        }
    }
}

/// One painted line of text
struct LineRect {
    y: u32,
    width: u32,
    height: u32,
    shaded: bool,
}

fn is_heading(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_preformatted(el: ElementRef<'_>) -> bool {
    el.value().name() == "pre" || el.value().classes().any(|c| c.contains("code"))
}

/// Greedy word wrap at a fixed character measure.
fn wrap(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if !cur.is_empty() && cur.chars().count() + word.chars().count() + 1 > chars_per_line {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

impl Rasterizer for TextRasterizer {
    fn render(&mut self, doc: &Html, block: &Block, target_width: u32) -> Result<RasterBuffer> {
        let content_width = target_width.saturating_sub(INNER_PADDING * 2).max(CHAR_CELL);
        let mut rects = Vec::new();
        let mut y = INNER_PADDING;

        for &id in &block.elements {
            let el = resolve(doc, id)
                .ok_or_else(|| Error::RenderFailure("stale element reference".into()))?;
            let scale = if is_heading(el) { 2 } else { 1 };
            let cell = CHAR_CELL * scale;
            let chars_per_line = (content_width / cell).max(1) as usize;
            let shaded = is_preformatted(el);

            let text = el.text().collect::<String>();
            let lines: Vec<String> = if shaded {
                // Preformatted text keeps its own line structure, clipped to
                // the measure instead of wrapped.
                text.lines()
                    .map(|l| l.chars().take(chars_per_line).collect())
                    .collect()
            } else {
                wrap(&text, chars_per_line)
            };

            if lines.is_empty() {
                // Elements with no text (images, fillers) still occupy one cell.
                rects.push(LineRect {
                    y,
                    width: content_width,
                    height: cell,
                    shaded: false,
                });
                y += cell + ELEMENT_SPACING;
                continue;
            }

            for line in &lines {
                let width = (line.chars().count() as u32 * cell).min(content_width);
                rects.push(LineRect {
                    y,
                    width: width.max(cell),
                    height: cell,
                    shaded,
                });
                y += cell + 2;
            }
            y += ELEMENT_SPACING;
        }

        let height = y.saturating_sub(ELEMENT_SPACING) + INNER_PADDING;
        let mut canvas =
            RgbaImage::from_pixel(target_width, height.max(INNER_PADDING * 2), self.background);
        for rect in &rects {
            let color = if rect.shaded { self.code_shade } else { self.foreground };
            fill_rect(&mut canvas, INNER_PADDING, rect.y, rect.width, rect.height, color);
        }
        Ok(RasterBuffer::new(canvas))
    }

    fn natural_width(&self, doc: &Html, block: &Block) -> u32 {
        let mut widest = 0u32;
        for &id in &block.elements {
            let Some(el) = resolve(doc, id) else { continue };
            let text = el.text().collect::<String>();
            let chars = if is_preformatted(el) {
                text.lines().map(|l| l.chars().count()).max().unwrap_or(0)
            } else {
                text.chars().count().min(PARAGRAPH_MEASURE)
            };
            let scale = if is_heading(el) { 2 } else { 1 };
            widest = widest.max(chars as u32 * CHAR_CELL * scale);
        }
        widest
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}
