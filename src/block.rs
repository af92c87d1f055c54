//! Block model: one logical visual unit of a chat response.
//!
//! Blocks do not own markup; they hold `ego_tree::NodeId` handles into the
//! parsed `scraper::Html` document the session was started from. The document
//! must outlive every block derived from it.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};

/// The structural flavor of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A heading element plus everything up to the next heading/divider
    Section,
    /// A run of content with no leading heading
    Default,
    /// Consecutive paragraph-level elements coalesced by a grouping adapter
    Paragraph,
    /// A standalone code/artifact element
    Code,
    /// The result of merging adjacent blocks
    Merged,
}

/// One logical visual unit of a response.
///
/// `elements` is never empty while the block is live. Only a `Merged` block
/// carries `merged_from`: the exact ordered run of blocks it replaced, kept
/// as full snapshots so an unmerge restores them verbatim.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub elements: Vec<NodeId>,
    pub is_heading: bool,
    pub merged_from: Option<Vec<Block>>,
}

impl Block {
    pub fn new(kind: BlockKind, elements: Vec<NodeId>) -> Self {
        debug_assert!(!elements.is_empty(), "block must hold at least one element");
        Self {
            kind,
            elements,
            is_heading: kind == BlockKind::Section,
            merged_from: None,
        }
    }

    /// Build the merged replacement for a contiguous run of blocks.
    /// Element order is the concatenation of the parts' elements.
    pub fn merged(parts: Vec<Block>) -> Self {
        debug_assert!(parts.len() >= 2, "merge needs at least two blocks");
        let elements = parts.iter().flat_map(|b| b.elements.iter().copied()).collect();
        Self {
            kind: BlockKind::Merged,
            elements,
            is_heading: false,
            merged_from: Some(parts),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.merged_from.is_some()
    }
}

/// Resolve a stored node id back to an element of the source document.
/// Returns `None` if the id does not name an element node (e.g. the document
/// was swapped out from under the session).
pub fn resolve<'a>(doc: &'a Html, id: NodeId) -> Option<ElementRef<'a>> {
    doc.tree.get(id).and_then(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn merged_block_concatenates_elements_in_order() {
        let doc = Html::parse_fragment("<p>a</p><p>b</p><p>c</p>");
        let sel = Selector::parse("p").unwrap();
        let ids: Vec<NodeId> = doc.select(&sel).map(|e| e.id()).collect();

        let a = Block::new(BlockKind::Default, vec![ids[0]]);
        let b = Block::new(BlockKind::Default, vec![ids[1], ids[2]]);
        let m = Block::merged(vec![a.clone(), b.clone()]);

        assert_eq!(m.kind, BlockKind::Merged);
        assert_eq!(m.elements, vec![ids[0], ids[1], ids[2]]);
        assert_eq!(
            m.elements.len(),
            a.elements.len() + b.elements.len()
        );
        assert!(m.is_merged());
        assert!(!a.is_merged());
    }

    #[test]
    fn resolve_round_trips_element_ids() {
        let doc = Html::parse_fragment("<p>hello</p>");
        let sel = Selector::parse("p").unwrap();
        let id = doc.select(&sel).next().unwrap().id();
        let el = resolve(&doc, id).expect("id resolves");
        assert_eq!(el.value().name(), "p");
    }
}
