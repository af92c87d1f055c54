//! Site adapter surface: the per-platform markup knowledge.
//!
//! Each supported chat platform differs only in how a response subtree is
//! located and how its children are classified (headings, dividers,
//! standalone code). That knowledge lives behind the [`SiteAdapter`] trait;
//! the segmenter and capture pipeline never branch on a concrete site.
//!
//! Adapters are stateless unit structs registered in [`ADAPTERS`] and looked
//! up by host substring via [`adapter_for_host`].

pub mod sites;

use scraper::{ElementRef, Html, Selector};

pub use sites::{
    ChatGlm, ChatGpt, Copilot, Deepseek, Doubao, Gemini, Kimi, NotebookLm, Qianwen,
};

/// How the segmenter should treat one candidate child of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Starts a new section block seeded with this element
    Header,
    /// Closes the open block; the divider itself is dropped
    Divider,
    /// A self-contained code/artifact element emitted as its own block
    Standalone,
    /// Consumed without affecting any block (layout noise)
    Skip,
    /// Ordinary content appended to the open block
    Content,
}

/// Granularity at which an adapter groups content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Heading-delimited sections with a default run before the first heading
    Sections,
    /// Consecutive non-heading children coalesce into paragraph blocks
    Paragraphs,
}

/// Markup knowledge for one chat platform.
///
/// Implementations are expected to be cheap, stateless values; everything
/// here reads the parsed document and returns borrowed references into it.
pub trait SiteAdapter: Sync {
    /// Short platform name, used in the output filename
    fn name(&self) -> &'static str;

    /// Host this adapter serves (matched by substring)
    fn host(&self) -> &'static str;

    /// CSS selector locating assistant response roots in document order
    fn response_selector(&self) -> &'static str;

    /// Classify one candidate child of a response root
    fn classify(&self, el: ElementRef<'_>) -> ElementRole;

    /// Grouping policy applied by the segmenter
    fn grouping(&self) -> Grouping {
        Grouping::Sections
    }

    /// Candidate children of a response root, in document order.
    ///
    /// The default walks direct element children; adapters for platforms
    /// that nest content (chatglm) or group at paragraph granularity
    /// (notebooklm) override this.
    fn collect_children<'a>(&self, response: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        response.children().filter_map(ElementRef::wrap).collect()
    }

    /// All assistant responses present in the document, in document order
    fn responses<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        let sel = Selector::parse(self.response_selector()).unwrap();
        doc.select(&sel).collect()
    }

    /// A short title for a response, used when listing responses.
    /// Adapters that know where the preceding user message lives override
    /// this; the default falls back to the response's own leading text.
    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        first_text_title(response, index)
    }
}

/// Every registered adapter, in lookup order.
pub const ADAPTERS: &[&dyn SiteAdapter] = &[
    &Deepseek,
    &NotebookLm,
    &ChatGpt,
    &Gemini,
    &Doubao,
    &Kimi,
    &Qianwen,
    &ChatGlm,
    &Copilot,
];

/// Look up the adapter for a host. Unknown hosts fall back to the deepseek
/// adapter, whose heading-delimited walk is the common case.
pub fn adapter_for_host(host: &str) -> &'static dyn SiteAdapter {
    ADAPTERS
        .iter()
        .copied()
        .find(|a| host.contains(a.host()))
        .unwrap_or(&Deepseek)
}

/// Tag name of an element, lowercased by the parser already.
pub(crate) fn tag(el: ElementRef<'_>) -> &str {
    el.value().name()
}

pub(crate) fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

pub(crate) fn class_attr_contains(el: ElementRef<'_>, fragment: &str) -> bool {
    el.value()
        .attr("class")
        .map_or(false, |c| c.contains(fragment))
}

pub(crate) fn prev_element_sibling<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

/// Collapse an element's text and truncate it for display.
pub(crate) fn truncated_text(el: ElementRef<'_>, max_chars: usize) -> Option<String> {
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut title: String = trimmed.chars().take(max_chars).collect();
    if trimmed.chars().count() > max_chars {
        title.push_str("...");
    }
    Some(title)
}

/// Default response title: leading text of the response, else "Response {n}".
pub(crate) fn first_text_title(response: ElementRef<'_>, index: usize) -> String {
    match truncated_text(response, 20) {
        Some(t) => t,
        None => format!("Response {}", index + 1),
    }
}
