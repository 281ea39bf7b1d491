//! Core conversion modules
//!
//! - `delta`: the delta document model and its typed attributes
//! - `reconcile`: table reconciliation matchers
//! - `clipboard`: HTML to delta conversion driving the matchers
//! - `host`: capabilities the reconciler needs from an editor
//! - `options`: reconciliation options

pub mod clipboard;
pub mod delta;
pub mod host;
pub mod options;
pub mod reconcile;

// Re-export main types
pub use clipboard::Clipboard;
pub use delta::{AttrKey, Attributes, Delta, Insert, Op, TableCellLine, TableTag};
pub use host::{DocumentHost, EditorHost, HtmlToDelta, PassContext, Range};
pub use options::{ReconcileOptions, TableOptions};
pub use reconcile::{rewrite_for_selection, TableMatcher};
