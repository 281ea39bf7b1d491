//! Table Reconciliation Engine
//!
//! Repairs the deltas a generic HTML converter produces for pasted tables so
//! that every line inside a table names its cell, every grid column has a
//! marker, and tables nested in cells are moved out.
//!
//! # Architecture
//!
//! ```text
//! td/th  -> position -> segment -> sanitize -> cell lines
//! table  -> broken-table check -> column markers -> drop routing keys
//! paste  -> caret cell lookup -> retag newlines
//! ```
//!
//! The converter calls [`TableMatcher`] once per `td`, `th` and `table`
//! element, after converting the element's children.

pub mod broken;
pub mod cell;
pub mod columns;
pub mod position;
pub mod sanitize;
pub mod segment;
pub mod selection;

#[cfg(test)]
mod tests;

use scraper::ElementRef;
use tracing::{debug, warn};

use crate::core::delta::{AttrKey, Delta};
use crate::core::host::{HtmlToDelta, PassContext};
use crate::core::options::ReconcileOptions;
use crate::utils::error::{ConversionWarning, WarningKind};

// Re-export public API
pub use broken::{degrade_to_text, flatten_nested_tables, is_broken, nested_tables};
pub use cell::{CellKind, CellLines};
pub use columns::{reconcile_columns, ColumnCounts};
pub use position::{CellPosition, CellStyle, Span};
pub use sanitize::{sanitize, TRANSIENT_KEYS};
pub use segment::{segment, Segment};
pub use selection::rewrite_for_selection;

/// Element matchers for table markup
pub struct TableMatcher<'a, C: HtmlToDelta + ?Sized> {
    converter: &'a C,
    options: &'a ReconcileOptions,
}

impl<'a, C: HtmlToDelta + ?Sized> TableMatcher<'a, C> {
    pub fn new(converter: &'a C, options: &'a ReconcileOptions) -> Self {
        Self { converter, options }
    }

    /// Rebuild the converted content of a `td`
    pub fn match_cell(&self, node: ElementRef<'_>, delta: Delta, ctx: &mut PassContext) -> Delta {
        let Some(position) = CellPosition::resolve(node) else {
            debug!("td outside of a table row, left as is");
            return delta;
        };
        for warning in position::span_warnings(node) {
            ctx.warn(warning);
        }
        CellLines::body(&position, CellStyle::resolve(node)).rebuild(&delta)
    }

    /// Rebuild the converted content of a `th` as a plain cell
    pub fn match_header(
        &self,
        node: ElementRef<'_>,
        delta: Delta,
        ctx: &mut PassContext,
    ) -> Delta {
        let Some(position) = CellPosition::resolve(node) else {
            debug!("th outside of a table row, left as is");
            return delta;
        };
        for warning in position::span_warnings(node) {
            ctx.warn(warning);
        }
        CellLines::header(&position).rebuild(&delta)
    }

    /// Finish a whole table: repair nesting, complete column markers and
    /// consume the `row` routing key.
    pub fn match_table(&self, node: ElementRef<'_>, delta: Delta, ctx: &mut PassContext) -> Delta {
        if is_broken(&delta) {
            return self.repair(node, &delta, ctx);
        }

        let Some(counts) = ColumnCounts::of(node) else {
            debug!("table without rows dropped");
            return Delta::new();
        };
        if counts.declared > counts.required {
            ctx.warn(ConversionWarning::new(
                WarningKind::ExtraColumns,
                format!(
                    "table declares {} columns but its first row spans {}",
                    counts.declared, counts.required
                ),
            ));
        }

        reconcile_columns(delta, counts).map_attributes(|attrs| attrs.omit(&[AttrKey::Row]))
    }

    fn repair(&self, node: ElementRef<'_>, delta: &Delta, ctx: &mut PassContext) -> Delta {
        let nested = nested_tables(node).len();
        if nested == 0 || ctx.depth() >= self.options.max_repair_depth {
            warn!(
                depth = ctx.depth(),
                nested, "nested table cannot be repaired, flattening to text"
            );
            ctx.warn(
                ConversionWarning::new(
                    WarningKind::RepairDepthExceeded,
                    format!("table flattened to text at repair depth {}", ctx.depth()),
                )
                .with_suggestion("raise maxRepairDepth to move nested tables instead"),
            );
            return degrade_to_text(delta);
        }

        debug!(depth = ctx.depth(), nested, "moving nested tables out of table");
        ctx.warn(ConversionWarning::new(
            WarningKind::NestedTable,
            format!("moved {} nested table(s) after their parent table", nested),
        ));
        let html = flatten_nested_tables(node, &self.options.table.table_in_table_error);
        ctx.descend(|ctx| self.converter.convert_html(&html, ctx))
    }
}
