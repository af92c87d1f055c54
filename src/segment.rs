//! Segmenter: turns a response subtree into an ordered block sequence.
//!
//! The walk keeps one open accumulator block and lets the adapter classify
//! each candidate child. Headers flush and reseed, dividers flush and drop,
//! standalone elements flush and emit, everything else extends the open
//! accumulator. Absence of content is an empty result, never an error.

use scraper::ElementRef;

use crate::adapter::{ElementRole, Grouping, SiteAdapter};
use crate::block::{Block, BlockKind};

/// Segment one response root into blocks using the adapter's rules.
pub fn segment(adapter: &dyn SiteAdapter, response: ElementRef<'_>) -> Vec<Block> {
    let children = adapter.collect_children(response);
    match adapter.grouping() {
        Grouping::Sections => walk(adapter, &children, BlockKind::Default),
        Grouping::Paragraphs => walk(adapter, &children, BlockKind::Paragraph),
    }
}

/// Shared accumulator walk. `run_kind` is the kind given to accumulators
/// opened by plain content: `Default` for heading-delimited sites,
/// `Paragraph` for paragraph-grouping sites.
fn walk(adapter: &dyn SiteAdapter, children: &[ElementRef<'_>], run_kind: BlockKind) -> Vec<Block> {
    let mut out = Vec::new();
    let mut open: Option<Block> = None;

    for &child in children {
        match adapter.classify(child) {
            ElementRole::Skip => continue,
            ElementRole::Divider => {
                flush(&mut out, &mut open);
            }
            ElementRole::Header => {
                flush(&mut out, &mut open);
                if run_kind == BlockKind::Paragraph {
                    // Paragraph-grouping sites emit each heading as its own
                    // section instead of opening a section accumulator.
                    out.push(Block::new(BlockKind::Section, vec![child.id()]));
                } else {
                    open = Some(Block::new(BlockKind::Section, vec![child.id()]));
                }
            }
            ElementRole::Standalone => {
                flush(&mut out, &mut open);
                out.push(Block::new(BlockKind::Code, vec![child.id()]));
            }
            ElementRole::Content => match open.as_mut() {
                Some(block) => block.elements.push(child.id()),
                None => open = Some(Block::new(run_kind, vec![child.id()])),
            },
        }
    }

    flush(&mut out, &mut open);
    out
}

fn flush(out: &mut Vec<Block>, open: &mut Option<Block>) {
    if let Some(block) = open.take() {
        // Accumulators are seeded with one element and only grow.
        debug_assert!(!block.elements.is_empty());
        out.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Deepseek, Gemini, NotebookLm};
    use scraper::{Html, Selector};

    fn response<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn headings_start_sections_and_leading_content_is_default() {
        let html = "<div class=\"ds-markdown\">\
                    <p>intro</p><h2>One</h2><p>a</p><p>b</p><h3>Two</h3><p>c</p>\
                    </div>";
        let doc = Html::parse_fragment(html);
        let blocks = segment(&Deepseek, response(&doc, ".ds-markdown"));

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Default);
        assert_eq!(blocks[0].elements.len(), 1);
        assert_eq!(blocks[1].kind, BlockKind::Section);
        assert_eq!(blocks[1].elements.len(), 3);
        assert!(blocks[1].is_heading);
        assert_eq!(blocks[2].kind, BlockKind::Section);
        assert_eq!(blocks[2].elements.len(), 2);
    }

    #[test]
    fn dividers_close_blocks_and_are_dropped() {
        let html = "<div class=\"markdown markdown-main-panel\">\
                    <p>a</p><hr><p>b</p>\
                    </div>";
        let doc = Html::parse_fragment(html);
        let blocks = segment(&Gemini, response(&doc, ".markdown"));

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].elements.len(), 1);
        assert_eq!(blocks[1].elements.len(), 1);
        // hr appears in neither block
        assert_eq!(blocks[0].kind, BlockKind::Default);
        assert_eq!(blocks[1].kind, BlockKind::Default);
    }

    #[test]
    fn empty_root_yields_empty_sequence() {
        let doc = Html::parse_fragment("<div class=\"ds-markdown\"></div>");
        let blocks = segment(&Deepseek, response(&doc, ".ds-markdown"));
        assert!(blocks.is_empty());
    }

    #[test]
    fn segmentation_is_deterministic() {
        let html = "<div class=\"ds-markdown\"><h2>A</h2><p>x</p><h2>B</h2><p>y</p></div>";
        let doc = Html::parse_fragment(html);
        let root = response(&doc, ".ds-markdown");
        let first = segment(&Deepseek, root);
        let second = segment(&Deepseek, root);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.elements, b.elements);
        }
    }

    #[test]
    fn paragraph_grouping_coalesces_runs_between_headings() {
        let html = "<div class=\"message-text-content\">\
                    <labs-tailwind-structural-element-view-v2><div class=\"paragraph\">p1</div></labs-tailwind-structural-element-view-v2>\
                    <labs-tailwind-structural-element-view-v2><div class=\"paragraph\">p2</div></labs-tailwind-structural-element-view-v2>\
                    <labs-tailwind-structural-element-view-v2><div class=\"paragraph heading3\">H</div></labs-tailwind-structural-element-view-v2>\
                    <labs-tailwind-structural-element-view-v2><div class=\"paragraph\">p3</div></labs-tailwind-structural-element-view-v2>\
                    </div>";
        let doc = Html::parse_fragment(html);
        let blocks = segment(&NotebookLm, response(&doc, ".message-text-content"));

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].elements.len(), 2);
        assert_eq!(blocks[1].kind, BlockKind::Section);
        assert!(blocks[1].is_heading);
        assert_eq!(blocks[2].kind, BlockKind::Paragraph);
        assert_eq!(blocks[2].elements.len(), 1);
    }
}
