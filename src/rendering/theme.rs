//! Page theme detection: decide whether captures should sit on a dark or
//! light background.
//!
//! Without a style engine the signal comes from explicit dark-mode markers
//! on `<html>`/`<body>` (classes, `data-theme`, `data-color-mode`) and from
//! an inline body background color when one is present.

use image::Rgba;
use scraper::{ElementRef, Html, Selector};

/// Background used for dark pages
pub const DARK_BACKGROUND: Rgba<u8> = Rgba([0x1e, 0x1e, 0x1e, 0xff]);
/// Background used for light pages
pub const LIGHT_BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Pick the capture background for a document.
pub fn detect_background(doc: &Html) -> Rgba<u8> {
    let html_sel = Selector::parse("html").unwrap();
    let body_sel = Selector::parse("body").unwrap();

    for sel in [&html_sel, &body_sel] {
        if let Some(el) = doc.select(sel).next() {
            if has_dark_marker(el) {
                return DARK_BACKGROUND;
            }
            if let Some(style) = el.value().attr("style") {
                if let Some(color) = inline_background(style) {
                    if is_color_dark(color) {
                        return DARK_BACKGROUND;
                    }
                }
            }
        }
    }
    LIGHT_BACKGROUND
}

fn has_dark_marker(el: ElementRef<'_>) -> bool {
    let classes = el
        .value()
        .classes()
        .any(|c| c == "dark" || c == "dark-mode");
    let attrs = el.value().attr("data-theme") == Some("dark")
        || el.value().attr("data-color-mode") == Some("dark");
    classes || attrs
}

/// Extract the value of a `background` / `background-color` declaration from
/// an inline style attribute.
fn inline_background(style: &str) -> Option<&str> {
    for decl in style.split(';') {
        let mut parts = decl.splitn(2, ':');
        let prop = parts.next()?.trim();
        if prop == "background" || prop == "background-color" {
            return parts.next().map(str::trim);
        }
    }
    None
}

/// Relative-luminance check for `rgb()` / `rgba()` colors. Unparseable or
/// transparent values count as light.
pub fn is_color_dark(color: &str) -> bool {
    let trimmed = color.trim();
    if trimmed == "transparent" || trimmed == "rgba(0, 0, 0, 0)" {
        return false;
    }
    match parse_rgb(trimmed) {
        Some([r, g, b]) => {
            let luminance = 0.299 * f32::from(r) / 255.0
                + 0.587 * f32::from(g) / 255.0
                + 0.114 * f32::from(b) / 255.0;
            luminance < 0.5
        }
        None => false,
    }
}

fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    let s = color.trim();
    let inner = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_luminance_classifies_dark_and_light() {
        assert!(is_color_dark("rgb(26, 26, 26)"));
        assert!(is_color_dark("rgba(0, 0, 0, 0.9)"));
        assert!(!is_color_dark("rgb(255, 255, 255)"));
        assert!(!is_color_dark("transparent"));
        assert!(!is_color_dark("rgba(0, 0, 0, 0)"));
    }

    #[test]
    fn dark_class_on_html_selects_dark_background() {
        let doc = Html::parse_document("<html class=\"dark\"><body></body></html>");
        assert_eq!(detect_background(&doc), DARK_BACKGROUND);
    }

    #[test]
    fn data_theme_attribute_selects_dark_background() {
        let doc = Html::parse_document("<html data-theme=\"dark\"><body></body></html>");
        assert_eq!(detect_background(&doc), DARK_BACKGROUND);
    }

    #[test]
    fn inline_dark_body_background_selects_dark() {
        let doc = Html::parse_document(
            "<html><body style=\"background-color: rgb(20, 20, 20)\"></body></html>",
        );
        assert_eq!(detect_background(&doc), DARK_BACKGROUND);
    }

    #[test]
    fn plain_page_defaults_to_light() {
        let doc = Html::parse_document("<html><body><p>hi</p></body></html>");
        assert_eq!(detect_background(&doc), LIGHT_BACKGROUND);
    }
}
