//! Column marker reconciliation
//!
//! Spreadsheet exports often keep the leading `<col>` declarations of a
//! table and drop the trailing ones. The editor needs exactly one
//! `table-col` marker per grid column, so the missing ones are synthesized.

use scraper::ElementRef;
use tracing::debug;

use crate::core::delta::{Attributes, Delta, Op};
use crate::core::reconcile::position::{cells_of, enclosing_table, rows_of, Span};
use crate::data::constants::MAX_COLSPAN;

/// Declared versus structurally required column counts of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCounts {
    /// `<col>` elements belonging to the table
    pub declared: usize,
    /// Sum of first-row colspans
    pub required: usize,
}

impl ColumnCounts {
    /// Count columns of `table`; `None` when it has no row at all.
    pub fn of(table: ElementRef<'_>) -> Option<Self> {
        let top_row = rows_of(table).next()?;
        let required = cells_of(top_row)
            .map(|cell| {
                Span::parse(cell.value().attr("colspan"), MAX_COLSPAN)
                    .unwrap_or_default()
                    .get() as usize
            })
            .sum();
        let declared = table
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| {
                el.value().name() == "col"
                    && enclosing_table(*el).is_some_and(|t| t.id() == table.id())
            })
            .count();
        Some(Self { declared, required })
    }

    pub fn deficit(&self) -> usize {
        self.required.saturating_sub(self.declared)
    }
}

/// Splice the missing column markers into `delta`.
///
/// Markers go in front when none are declared, otherwise right after the
/// run of declared markers so styles attached to them stay in place.
pub fn reconcile_columns(delta: Delta, counts: ColumnCounts) -> Delta {
    let deficit = counts.deficit();
    if deficit == 0 {
        return delta;
    }

    let markers: Delta = (0..deficit)
        .map(|_| Op::text("\n", Attributes::table_col()))
        .collect();
    debug!(
        declared = counts.declared,
        required = counts.required,
        "synthesizing {} column marker(s)",
        deficit
    );

    let ops = delta.into_ops();
    let last_marker = ops
        .iter()
        .rposition(|op| op.attributes.is_table_col())
        .filter(|_| counts.declared > 0);
    let Some(last_marker) = last_marker else {
        return markers.concat(ops.into_iter().collect());
    };

    let mut out = Delta::new();
    let mut seen = 0;
    let mut spliced = false;
    for (i, op) in ops.into_iter().enumerate() {
        let is_marker = op.attributes.is_table_col();
        if is_marker {
            seen += op.newline_count();
        }
        out.push(op);
        if !spliced && is_marker && (seen >= counts.declared || i == last_marker) {
            out = out.concat(markers.clone());
            spliced = true;
        }
    }
    out
}
