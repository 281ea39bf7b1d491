//! Retagging pasted content for the cell under the caret

use tracing::trace;

use crate::core::delta::{Attributes, Delta, Op};
use crate::core::host::EditorHost;
use crate::core::reconcile::position::CellPosition;
use crate::core::reconcile::segment::{segment, Segment};

/// Make `delta` land inside the caret's table cell.
///
/// When the caret sits in a cell, every newline of the incoming delta is
/// split out and tagged with that cell's `table-cell-line`; the terminator
/// keeps no other attribute. Otherwise `delta` is returned as is.
pub fn rewrite_for_selection<H: EditorHost + ?Sized>(host: &H, delta: Delta) -> Delta {
    let Some(range) = host.selection() else {
        return delta;
    };
    let Some(leaf) = host.leaf_at(range.index) else {
        return delta;
    };
    if !host.is_in_table_cell(&leaf) {
        return delta;
    }
    let Some(position) = host.cell_element(&leaf).and_then(CellPosition::resolve) else {
        return delta;
    };
    trace!(row = position.row, cell = position.cell, "pasting into table cell");

    let line = Attributes::cell_line(position.cell_line());
    let mut out = Delta::new();
    for op in &delta {
        for piece in segment(op) {
            match piece {
                Segment::Terminator => out.push(Op::text("\n", line.clone())),
                Segment::Text(text) => out.push(Op::text(text, op.attributes.clone())),
                Segment::Embed(insert) => out.push(Op {
                    insert: insert.clone(),
                    attributes: op.attributes.clone(),
                }),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delta::TableCellLine;
    use crate::core::host::DocumentHost;
    use crate::core::options::ReconcileOptions;
    use pretty_assertions::assert_eq;

    const DOC: &str = "<p>Top</p><table><tr><td>a1</td><td>b1</td></tr>\
                       <tr><td>a2</td><td colspan=\"2\">b2</td></tr></table>";

    fn host(caret: usize) -> DocumentHost {
        DocumentHost::parse(DOC, ReconcileOptions::default()).with_caret(caret)
    }

    #[test]
    fn test_paste_into_cell_retags_newlines() {
        // "Top" 0..3, "a1" 3..5, "b1" 5..7, "a2" 7..9
        let out = rewrite_for_selection(&host(8), Delta::new().insert("a\nb", Attributes::new()));
        assert_eq!(
            out,
            Delta::new()
                .insert("a", Attributes::new())
                .insert("\n", Attributes::cell_line(TableCellLine::new(2, 1)))
                .insert("b", Attributes::new())
        );
    }

    #[test]
    fn test_trailing_newline_loses_its_formats() {
        let incoming = Delta::new().insert("x\n", Attributes::new().with_bold());
        let out = rewrite_for_selection(&host(9), incoming);
        let line = TableCellLine::new(2, 2).with_spans(None, Some(2));
        assert_eq!(
            out,
            Delta::new()
                .insert("x", Attributes::new().with_bold())
                .insert("\n", Attributes::cell_line(line))
        );
    }

    #[test]
    fn test_outside_table_is_untouched() {
        let incoming = Delta::new().insert("a\nb\n", Attributes::new());
        assert_eq!(rewrite_for_selection(&host(1), incoming.clone()), incoming);
    }

    #[test]
    fn test_no_selection_is_untouched() {
        let host = DocumentHost::parse(DOC, ReconcileOptions::default());
        let incoming = Delta::new().insert("a\n", Attributes::new());
        assert_eq!(rewrite_for_selection(&host, incoming.clone()), incoming);
    }

    #[test]
    fn test_embeds_pass_through() {
        let incoming = Delta::new()
            .insert_embed("image", serde_json::json!("a.png"), Attributes::new())
            .insert("\n", Attributes::new());
        let out = rewrite_for_selection(&host(4), incoming);
        assert_eq!(out.ops().len(), 2);
        assert_eq!(out.ops()[0].len(), 1);
        assert_eq!(
            out.ops()[1].attributes,
            Attributes::cell_line(TableCellLine::new(1, 1))
        );
    }
}
