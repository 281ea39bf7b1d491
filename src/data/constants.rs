//! HTML vocabulary used by the clipboard converter and the reconciler

use phf::phf_set;

/// Elements that end a line when they have content.
///
/// `th` is absent: header cells get their terminator from the header
/// rebuild.
pub static BLOCK_TAGS: phf::Set<&'static str> = phf_set! {
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "tbody", "td", "tfoot", "thead", "tr", "ul",
};

/// Elements whose subtree never contributes content
pub static IGNORED_TAGS: phf::Set<&'static str> = phf_set! {
    "head", "meta", "link", "script", "style", "template", "title",
};

/// Table sections that may sit between a `<table>` and its rows
pub static ROW_GROUP_TAGS: phf::Set<&'static str> = phf_set! {
    "tbody", "thead", "tfoot",
};

/// Table structure elements; whitespace between them is layout
pub static TABLE_PART_TAGS: phf::Set<&'static str> = phf_set! {
    "table", "caption", "colgroup", "col", "thead", "tbody", "tfoot", "tr", "th", "td",
};

/// Largest `colspan` a user agent honours
pub const MAX_COLSPAN: u32 = 1000;

/// Largest `rowspan` a user agent honours
pub const MAX_ROWSPAN: u32 = 65534;

/// Attribute carrying a cell background written by the editor itself
pub const DATA_CELL_BG: &str = "data-cell-bg";

/// Attribute carrying a cell border written by the editor itself
pub const DATA_CELL_BORDER: &str = "data-cell-border";

/// Default limit for re-running the pipeline on a repaired table
pub const DEFAULT_MAX_REPAIR_DEPTH: usize = 4;

/// Diagnostic prefix used by [`crate::ReconcileOptions::annotated`]
pub const ANNOTATED_TABLE_IN_TABLE_ERROR: &str =
    "This inner table was placed outside the parent table";
