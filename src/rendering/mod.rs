//! Built-in rendering helpers: a deterministic text-metric rasterizer and
//! page theme detection.
//!
//! These are the crate's own implementation of the rasterizer capability;
//! callers integrating a real renderer implement [`crate::Rasterizer`]
//! themselves and ignore this module.

pub mod text;
pub mod theme;

pub use text::TextRasterizer;
pub use theme::{detect_background, is_color_dark};
