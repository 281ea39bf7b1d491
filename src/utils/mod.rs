//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Table diagnostics and reporting
//! - Inline style parsing
//! - Error types and result types

pub mod css;
pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{check_html, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, WarningKind,
};
