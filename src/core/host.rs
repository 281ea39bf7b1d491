//! Host editor capabilities
//!
//! The reconciler never reaches for a global editor. Everything it needs
//! from the host is injected through [`HtmlToDelta`] (re-running the
//! converter on repaired markup) and [`EditorHost`] (caret lookups for
//! pastes into a cell).

use scraper::{ElementRef, Html, Node};

use crate::core::clipboard::Clipboard;
use crate::core::delta::Delta;
use crate::core::options::ReconcileOptions;
use crate::core::reconcile::position::is_cell;
use crate::utils::error::ConversionWarning;

/// State threaded through one reconciliation pass
#[derive(Debug, Default)]
pub struct PassContext {
    depth: usize,
    warnings: Vec<ConversionWarning>,
}

impl PassContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many repaired tables enclose the markup being converted
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn warn(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }

    /// Run `f` one repair level deeper
    pub(crate) fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }
}

/// Caret or selection in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }
}

/// The host's generic HTML → delta conversion
pub trait HtmlToDelta {
    /// Convert `html`, reconciling any tables it contains at `ctx.depth()`
    fn convert_html(&self, html: &str, ctx: &mut PassContext) -> Delta;
}

/// Editor capabilities needed when pasting at the caret
pub trait EditorHost: HtmlToDelta {
    /// Handle to a content node of the live document
    type Leaf;

    fn selection(&self) -> Option<Range>;

    fn leaf_at(&self, index: usize) -> Option<Self::Leaf>;

    fn is_in_table_cell(&self, leaf: &Self::Leaf) -> bool;

    /// The `td`/`th` element holding `leaf`
    fn cell_element(&self, leaf: &Self::Leaf) -> Option<ElementRef<'_>>;
}

/// Position of a text node in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafId(usize);

/// A host backed by a parsed HTML document.
///
/// Document indices count the characters of the document's text nodes in
/// order; there is no implicit newline at block boundaries.
pub struct DocumentHost {
    document: Html,
    caret: Option<Range>,
    clipboard: Clipboard,
}

impl DocumentHost {
    pub fn parse(html: &str, options: ReconcileOptions) -> Self {
        Self {
            document: Html::parse_fragment(html),
            caret: None,
            clipboard: Clipboard::new(options),
        }
    }

    pub fn with_caret(mut self, index: usize) -> Self {
        self.caret = Some(Range::caret(index));
        self
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }
}

impl HtmlToDelta for DocumentHost {
    fn convert_html(&self, html: &str, ctx: &mut PassContext) -> Delta {
        self.clipboard.convert_html(html, ctx)
    }
}

impl EditorHost for DocumentHost {
    type Leaf = LeafId;

    fn selection(&self) -> Option<Range> {
        self.caret
    }

    fn leaf_at(&self, index: usize) -> Option<LeafId> {
        let mut offset = 0;
        let mut last = None;
        for (i, node) in self.document.root_element().descendants().enumerate() {
            if let Node::Text(text) = node.value() {
                let len = text.chars().count();
                if index < offset + len {
                    return Some(LeafId(i));
                }
                offset += len;
                last = Some(LeafId(i));
            }
        }
        // a caret at the very end sits in the last leaf
        if index == offset {
            last
        } else {
            None
        }
    }

    fn is_in_table_cell(&self, leaf: &LeafId) -> bool {
        self.cell_element(leaf).is_some()
    }

    fn cell_element(&self, leaf: &LeafId) -> Option<ElementRef<'_>> {
        let node = self.document.root_element().descendants().nth(leaf.0)?;
        node.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| is_cell(*el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<p>Intro</p><table><tr><td>ab</td><td>cd</td></tr><tr><td>ef</td></tr></table>";

    #[test]
    fn test_leaf_lookup_by_offset() {
        let host = DocumentHost::parse(DOC, ReconcileOptions::default());
        // "Intro" = 0..5, "ab" = 5..7
        let intro = host.leaf_at(2).unwrap();
        assert!(!host.is_in_table_cell(&intro));
        let ab = host.leaf_at(5).unwrap();
        assert!(host.is_in_table_cell(&ab));
        assert_eq!(host.cell_element(&ab).unwrap().inner_html(), "ab");
        assert!(host.leaf_at(100).is_none());
    }

    #[test]
    fn test_caret_at_end() {
        let host = DocumentHost::parse(DOC, ReconcileOptions::default());
        let end = host.leaf_at(11).unwrap();
        assert_eq!(host.cell_element(&end).unwrap().inner_html(), "ef");
    }

    #[test]
    fn test_context_depth() {
        let mut ctx = PassContext::new();
        let inner = ctx.descend(|ctx| ctx.depth());
        assert_eq!(inner, 1);
        assert_eq!(ctx.depth(), 0);
    }
}
