//! Cell-line rebuilding
//!
//! Turns the raw content delta of one `td`/`th` into a delta whose every
//! line terminator names the cell it belongs to.
//!
//! Body cells carry their background and border on the line attribute and
//! keep whatever line formats the source terminator had. Header cells are
//! reduced to plain cell lines, and since the converter does not end a
//! `th` with a newline, a header that produced no terminator gets one.

use crate::core::delta::{AttrKey, Attributes, Delta, Op, TableCellLine};
use crate::core::reconcile::position::{CellPosition, CellStyle};
use crate::core::reconcile::sanitize::{sanitize, strip_background_collision};
use crate::core::reconcile::segment::{segment, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Body,
    Header,
}

/// Rebuild rules for one cell
#[derive(Debug, Clone)]
pub struct CellLines {
    kind: CellKind,
    line: TableCellLine,
}

impl CellLines {
    pub fn body(position: &CellPosition, style: CellStyle) -> Self {
        Self {
            kind: CellKind::Body,
            line: position
                .cell_line()
                .with_style(style.background, style.border),
        }
    }

    pub fn header(position: &CellPosition) -> Self {
        Self {
            kind: CellKind::Header,
            line: position.cell_line(),
        }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn line(&self) -> &TableCellLine {
        &self.line
    }

    /// Rebuild `delta` as the content of this cell.
    pub fn rebuild(&self, delta: &Delta) -> Delta {
        // an empty cell still owns one line
        if delta.is_empty() {
            return Delta::new().insert("\n", Attributes::cell_line(self.line.clone()));
        }

        let mut out = Delta::new();
        let mut terminated = false;
        for op in delta {
            for piece in segment(op) {
                terminated = piece == Segment::Terminator;
                match piece {
                    Segment::Terminator => {
                        out.push(Op::text("\n", self.terminator_attributes(&op.attributes)));
                    }
                    Segment::Text(text) => {
                        out.push(Op::text(text, self.content_attributes(&op.attributes)));
                    }
                    Segment::Embed(insert) => out.push(Op {
                        insert: insert.clone(),
                        attributes: self.content_attributes(&op.attributes),
                    }),
                }
            }
        }

        // the last line of a header is never terminated by the converter
        if self.kind == CellKind::Header && !terminated {
            out.push(Op::text("\n", self.terminator_attributes(&Attributes::new())));
        }
        out
    }

    fn terminator_attributes(&self, source: &Attributes) -> Attributes {
        match self.kind {
            // a column marker keeps its routing so a nested table is detected
            CellKind::Header if source.is_table_col() => Attributes {
                table_col: Some(true),
                row: Some(self.line.row),
                ..Attributes::cell_line(self.line.clone())
            },
            CellKind::Header => Attributes::cell_line(self.line.clone()),
            CellKind::Body => {
                let row = source
                    .table
                    .as_ref()
                    .and_then(|group| group.row)
                    .unwrap_or(self.line.row);
                let own = Attributes {
                    row: Some(row),
                    table_cell_line: Some(self.line.clone()),
                    ..Attributes::default()
                };
                source
                    .omit(&[AttrKey::Table, AttrKey::TableCellLine, AttrKey::Row])
                    .merge(&own)
            }
        }
    }

    fn content_attributes(&self, source: &Attributes) -> Attributes {
        let attrs = sanitize(source);
        match self.kind {
            CellKind::Header => attrs,
            CellKind::Body => {
                strip_background_collision(attrs, self.line.cell_background.as_deref())
            }
        }
    }
}
