//! # tablemend
//!
//! Table reconciliation for rich-text deltas converted from pasted HTML.
//!
//! ## Features
//!
//! - **Cell Lines**: Every line inside a table names its row and cell
//! - **Column Markers**: Missing `<col>` declarations are synthesized from the first row
//! - **Nested Tables**: Tables pasted inside a cell are moved after their parent
//! - **Paste Into Cell**: Pasted content is retagged for the cell under the caret
//! - **Bounded Repair**: Re-conversion depth is limited; beyond it tables fail closed to text
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Converting Pasted HTML
//!
//! ```rust
//! use tablemend::html_to_delta;
//!
//! let delta = html_to_delta("<table><tr><td>a</td><td>b</td></tr></table>");
//! let json = serde_json::to_string(&delta).unwrap();
//! assert!(json.contains("table-cell-line"));
//! assert!(json.contains("table-col"));
//! ```
//!
//! ### Pasting Into a Cell
//!
//! ```rust
//! use tablemend::{paste_into, DocumentHost, ReconcileOptions};
//!
//! let host = DocumentHost::parse(
//!     "<table><tr><td>a1</td><td>b1</td></tr></table>",
//!     ReconcileOptions::default(),
//! )
//! .with_caret(3);
//! let output = paste_into(&host, "<p>one</p><p>two</p>");
//! assert!(output.delta.iter().all(|op| op.as_text() != Some("\n")
//!     || op.attributes.table_cell_line.is_some()));
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static mappings and constants
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core types
pub use core::clipboard::Clipboard;
pub use core::delta::{AttrKey, Attributes, Delta, Insert, Op, TableCellLine, TableTag};
pub use core::host::{DocumentHost, EditorHost, HtmlToDelta, LeafId, PassContext, Range};
pub use core::options::{ReconcileOptions, TableOptions};
pub use core::reconcile;
pub use core::reconcile::{rewrite_for_selection, TableMatcher};

// Re-export data modules
pub use data::colors;
pub use data::constants;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, WarningKind,
};

/// Convert pasted HTML to a reconciled delta
///
/// # Arguments
/// * `html` - HTML fragment as found on the clipboard
///
/// # Returns
/// Delta whose tables satisfy the cell-line and column-marker invariants
pub fn html_to_delta(html: &str) -> Delta {
    html_to_delta_with_diagnostics(html, &ReconcileOptions::default()).delta
}

/// Convert pasted HTML to a reconciled delta with custom options
pub fn html_to_delta_with_options(html: &str, options: &ReconcileOptions) -> Delta {
    html_to_delta_with_diagnostics(html, options).delta
}

/// Convert pasted HTML, returning the repairs made along the way
pub fn html_to_delta_with_diagnostics(html: &str, options: &ReconcileOptions) -> ConversionOutput {
    Clipboard::new(options.clone()).convert(html)
}

/// Convert pasted HTML and retag it for the cell under the host's caret
///
/// Outside a table cell this is plain conversion.
pub fn paste_into<H: EditorHost + ?Sized>(host: &H, html: &str) -> ConversionOutput {
    let mut ctx = PassContext::new();
    let delta = host.convert_html(html, &mut ctx);
    let delta = rewrite_for_selection(host, delta);
    ConversionOutput::with_warnings(delta, ctx.into_warnings())
}

/// Decode a delta from its JSON form (`{"ops": [...]}`)
pub fn parse_delta(input: &str) -> ConversionResult<Delta> {
    Ok(serde_json::from_str(input)?)
}
