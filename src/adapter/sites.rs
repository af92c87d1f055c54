//! Concrete platform adapters.
//!
//! Each adapter encodes one platform's markup conventions: where responses
//! live, which tags open a new section, which elements are dividers, and
//! (where the platform exposes it) where the preceding user message sits so
//! a response can be titled after the question that produced it.

use scraper::{ElementRef, Selector};

use super::{
    class_attr_contains, first_text_title, has_class, prev_element_sibling, tag, truncated_text,
    ElementRole, Grouping, SiteAdapter,
};

/// deepseek: h2/h3 headings delimit sections.
pub struct Deepseek;

impl SiteAdapter for Deepseek {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn host(&self) -> &'static str {
        "chat.deepseek.com"
    }

    fn response_selector(&self) -> &'static str {
        ".ds-markdown"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        match tag(el) {
            "h2" | "h3" => ElementRole::Header,
            _ => ElementRole::Content,
        }
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        // The user message is the previous sibling of the enclosing
        // message container.
        let container = response
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| class_attr_contains(*a, "message"))
            .or_else(|| response.parent().and_then(ElementRef::wrap));
        if let Some(user) = container.and_then(prev_element_sibling) {
            if let Some(title) = truncated_text(user, 20) {
                return title;
            }
        }
        first_text_title(response, index)
    }
}

/// chatgpt: h2/h3 headings and top-level lists all start sections.
pub struct ChatGpt;

impl SiteAdapter for ChatGpt {
    fn name(&self) -> &'static str {
        "chatgpt"
    }

    fn host(&self) -> &'static str {
        "chatgpt.com"
    }

    fn response_selector(&self) -> &'static str {
        "[data-message-author-role=\"assistant\"] .markdown.prose"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        match tag(el) {
            "h2" | "h3" | "ol" | "ul" => ElementRole::Header,
            _ => ElementRole::Content,
        }
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        // Walk back through earlier turns looking for a user message.
        let sel = Selector::parse("[data-message-author-role=\"user\"]").unwrap();
        let turn = response
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().attr("data-message-author-role") == Some("assistant"));
        let mut prev = turn.and_then(prev_element_sibling);
        while let Some(el) = prev {
            if let Some(user) = el.select(&sel).next() {
                if let Some(title) = truncated_text(user, 20) {
                    return title;
                }
            }
            prev = prev_element_sibling(el);
        }
        first_text_title(response, index)
    }
}

/// gemini: h2/h3 headings, `hr` dividers.
pub struct Gemini;

impl SiteAdapter for Gemini {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn host(&self) -> &'static str {
        "gemini.google.com"
    }

    fn response_selector(&self) -> &'static str {
        ".markdown.markdown-main-panel"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        match tag(el) {
            "h2" | "h3" => ElementRole::Header,
            "hr" => ElementRole::Divider,
            _ => ElementRole::Content,
        }
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        let query = Selector::parse(".query-text").unwrap();
        let turn = response
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| tag(*a) == "conversation-turn" || a.value().attr("data-turn-id").is_some());
        if let Some(prev) = turn.and_then(prev_element_sibling) {
            if let Some(user) = prev.select(&query).next() {
                if let Some(title) = truncated_text(user, 20) {
                    return title;
                }
            }
        }
        first_text_title(response, index)
    }
}

/// doubao: like gemini, plus line-break filler divs that must be skipped.
pub struct Doubao;

impl SiteAdapter for Doubao {
    fn name(&self) -> &'static str {
        "doubao"
    }

    fn host(&self) -> &'static str {
        "www.doubao.com"
    }

    fn response_selector(&self) -> &'static str {
        "[data-testid=\"message_text_content\"].flow-markdown-body"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        if has_class(el, "md-box-line-break") {
            return ElementRole::Skip;
        }
        match tag(el) {
            "h2" | "h3" => ElementRole::Header,
            "hr" => ElementRole::Divider,
            _ => ElementRole::Content,
        }
    }
}

/// kimi: h2/h3/h4 headings.
pub struct Kimi;

impl SiteAdapter for Kimi {
    fn name(&self) -> &'static str {
        "kimi"
    }

    fn host(&self) -> &'static str {
        "www.kimi.com"
    }

    fn response_selector(&self) -> &'static str {
        ".markdown"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        match tag(el) {
            "h2" | "h3" | "h4" => ElementRole::Header,
            _ => ElementRole::Content,
        }
    }
}

/// qianwen: headings and dividers may be plain tags or decorated classes.
pub struct Qianwen;

impl SiteAdapter for Qianwen {
    fn name(&self) -> &'static str {
        "qianwen"
    }

    fn host(&self) -> &'static str {
        "www.qianwen.com"
    }

    fn response_selector(&self) -> &'static str {
        ".qk-markdown"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        if tag(el) == "hr" || has_class(el, "qk-md-hr") {
            return ElementRole::Divider;
        }
        if matches!(tag(el), "h2" | "h3") || has_class(el, "qk-md-head") {
            return ElementRole::Header;
        }
        ElementRole::Content
    }
}

/// chatglm: content is nested inside markdown bodies, with standalone
/// artifact/code elements interleaved at the same level.
pub struct ChatGlm;

impl SiteAdapter for ChatGlm {
    fn name(&self) -> &'static str {
        "chatglm"
    }

    fn host(&self) -> &'static str {
        "chatglm.cn"
    }

    fn response_selector(&self) -> &'static str {
        ".answer-content-wrap"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        if has_class(el, "code-no-artifacts") {
            return ElementRole::Standalone;
        }
        match tag(el) {
            "h3" | "h4" => ElementRole::Header,
            "hr" => ElementRole::Divider,
            _ => ElementRole::Content,
        }
    }

    fn collect_children<'a>(&self, response: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let content = Selector::parse(".markdown-body.md-body, .code-no-artifacts").unwrap();
        let mut out = Vec::new();
        for el in response.select(&content) {
            if has_class(el, "code-no-artifacts") {
                out.push(el);
            } else {
                out.extend(el.children().filter_map(ElementRef::wrap));
            }
        }
        out
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        let heading = Selector::parse("h3, h4").unwrap();
        if let Some(h) = response.select(&heading).next() {
            if let Some(title) = truncated_text(h, 30) {
                return title;
            }
        }
        first_text_title(response, index)
    }
}

/// copilot: h1/h2 headings; sections are separated by decorated border divs.
pub struct Copilot;

impl SiteAdapter for Copilot {
    fn name(&self) -> &'static str {
        "copilot"
    }

    fn host(&self) -> &'static str {
        "copilot.microsoft.com"
    }

    fn response_selector(&self) -> &'static str {
        ".group\\/ai-message-item"
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        if tag(el) == "div" && (has_class(el, "pb-6") || class_attr_contains(el, "after:border-b")) {
            return ElementRole::Divider;
        }
        match tag(el) {
            "h1" | "h2" => ElementRole::Header,
            _ => ElementRole::Content,
        }
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        let heading = Selector::parse("h1, h2").unwrap();
        if let Some(h) = response.select(&heading).next() {
            if let Some(title) = truncated_text(h, 30) {
                return title;
            }
        }
        first_text_title(response, index)
    }
}

/// notebooklm: no tag-level structure; paragraph views are grouped, with
/// heading paragraphs starting sections.
pub struct NotebookLm;

impl SiteAdapter for NotebookLm {
    fn name(&self) -> &'static str {
        "notebooklm"
    }

    fn host(&self) -> &'static str {
        "notebooklm.google.com"
    }

    fn response_selector(&self) -> &'static str {
        ".to-user-message-card-content .message-text-content"
    }

    fn grouping(&self) -> Grouping {
        Grouping::Paragraphs
    }

    fn classify(&self, el: ElementRef<'_>) -> ElementRole {
        let heading = Selector::parse(".paragraph.heading3").unwrap();
        if el.select(&heading).next().is_some() {
            ElementRole::Header
        } else {
            ElementRole::Content
        }
    }

    fn collect_children<'a>(&self, response: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let para = Selector::parse("labs-tailwind-structural-element-view-v2").unwrap();
        response.select(&para).collect()
    }

    fn title_of(&self, response: ElementRef<'_>, index: usize) -> String {
        let user = Selector::parse(".from-user-container .message-text-content").unwrap();
        let pair = response
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| has_class(*a, "chat-message-pair"));
        if let Some(msg) = pair.and_then(|p| p.select(&user).next()) {
            if let Some(title) = truncated_text(msg, 20) {
                return title;
            }
        }
        first_text_title(response, index)
    }
}
