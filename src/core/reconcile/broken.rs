//! Nested-table detection and flattening
//!
//! The editor cannot represent a table inside a cell. When one is pasted,
//! the outer cell rebuild tags the inner table's column markers with a
//! `row`, which never happens for a well-formed table. That co-occurrence
//! is the signal used here.

use scraper::ElementRef;

use crate::core::delta::{Attributes, Delta, Op, TABLE_KEYS};
use crate::core::reconcile::position::enclosing_table;

/// Whether `delta` carries the nested-table signal
pub fn is_broken(delta: &Delta) -> bool {
    delta
        .iter()
        .any(|op| op.attributes.is_broken_table_signal())
}

/// Tables directly nested in `table`'s cells.
///
/// Tables nested deeper belong to these and travel with them.
pub fn nested_tables<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    table
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            el.value().name() == "table"
                && enclosing_table(*el).is_some_and(|t| t.id() == table.id())
        })
        .collect()
}

/// Markup for `table` with its nested tables moved after it.
///
/// Each moved table is preceded by a line break and `prefix`. The source
/// document is left untouched; the nested tables are detached from a copy.
pub fn flatten_nested_tables(table: ElementRef<'_>, prefix: &str) -> String {
    let nested = nested_tables(table);

    let mut tree = table.tree().clone();
    for inner in &nested {
        if let Some(mut node) = tree.get_mut(inner.id()) {
            node.detach();
        }
    }
    let mut html = tree
        .get(table.id())
        .and_then(ElementRef::wrap)
        .map(|outer| outer.html())
        .unwrap_or_default();

    for inner in nested {
        html.push_str("<br>");
        html.push_str(&escape_text(prefix));
        html.push_str(&inner.html());
    }
    html
}

/// Plain-text fallback for a table that cannot be repaired: column
/// markers are dropped and every line loses its table attributes.
///
/// A nested table's markers also end the cell line before them, so each
/// run of them becomes one plain line break.
pub fn degrade_to_text(delta: &Delta) -> Delta {
    delta
        .iter()
        .filter(|op| !op.attributes.is_table_col() || op.attributes.row.is_some())
        .map(|op| {
            if op.attributes.is_broken_table_signal() {
                return Op::text("\n", Attributes::new());
            }
            let mut op = op.clone();
            op.attributes = op.attributes.omit(TABLE_KEYS);
            op
        })
        .collect()
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
