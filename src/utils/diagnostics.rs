//! Table diagnostics
//!
//! Reports what the reconciler would have to repair in a piece of HTML
//! without converting it:
//!
//! - Tables nested inside cells
//! - Column declarations that fall short of, or exceed, the first row
//! - Span attributes that are not positive integers
//! - Tables without any row
//!
//! ## Example
//!
//! ```rust
//! use tablemend::diagnostics::{check_html, DiagnosticLevel};
//!
//! let result = check_html("<table><tr><td><table><tr><td>x</td></tr></table></td></tr></table>");
//! assert!(result.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Warning));
//! ```

use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::core::reconcile::position::{cells_of, enclosing_table, rows_of, span_warnings};
use crate::core::reconcile::{nested_tables, ColumnCounts};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note, repaired silently
    Info,
    /// Warning - the pasted table will change shape
    Warning,
    /// Error - the input could not be inspected
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// 1-based index of the table in document order
    pub table: Option<usize>,
    /// Cell coordinates `(row, cell)`, 1-based
    pub cell: Option<(u32, u32)>,
    /// Relevant source markup
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            table: None,
            cell: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_cell(mut self, row: u32, cell: u32) -> Self {
        self.cell = Some((row, cell));
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> table 2, row 1, cell 3
        //         |
        //         | <td colspan="x">
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        match (self.table, self.cell) {
            (Some(table), Some((row, cell))) => {
                write!(f, "\n  --> table {}, row {}, cell {}", table, row, cell)?
            }
            (Some(table), None) => write!(f, "\n  --> table {}", table)?,
            _ => {}
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
    /// Number of tables inspected
    pub tables: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(plural(self.errors, "error"));
        }
        if self.warnings > 0 {
            parts.push(plural(self.warnings, "warning"));
        }
        if self.infos > 0 {
            parts.push(plural(self.infos, "note"));
        }
        let tables = plural(self.tables, "table");
        if parts.is_empty() {
            format!("{} checked, no issues found", tables)
        } else {
            format!("{} checked, {}", tables, parts.join(", "))
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

/// Check every table in `input` for structure the reconciler repairs
pub fn check_html(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    let doc = Html::parse_fragment(input);
    let Ok(selector) = Selector::parse("table") else {
        result.add(Diagnostic::new(
            DiagnosticLevel::Error,
            "internal selector failed to parse",
        ));
        return result;
    };

    let tables: Vec<ElementRef<'_>> = doc.select(&selector).collect();
    result.tables = tables.len();
    for (i, table) in tables.iter().enumerate() {
        check_table(*table, i + 1, &tables, &mut result);
    }
    result
}

fn check_table(
    table: ElementRef<'_>,
    index: usize,
    all: &[ElementRef<'_>],
    result: &mut CheckResult,
) {
    if let Some(parent) = enclosing_table(table) {
        let parent_index = all
            .iter()
            .position(|t| t.id() == parent.id())
            .map_or(0, |p| p + 1);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!("table nested inside a cell of table {}", parent_index),
            )
            .with_table(index)
            .with_suggestion("it will be moved after its parent table"),
        );
    }

    let Some(counts) = ColumnCounts::of(table) else {
        result.add(
            Diagnostic::new(DiagnosticLevel::Info, "table has no rows and will be dropped")
                .with_table(index),
        );
        return;
    };

    if counts.declared > counts.required {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!(
                    "{} columns declared but the first row spans {}",
                    counts.declared, counts.required
                ),
            )
            .with_table(index),
        );
    } else if counts.deficit() > 0 && counts.declared > 0 {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                format!(
                    "{} of {} columns declared, {} will be added",
                    counts.declared,
                    counts.required,
                    counts.deficit()
                ),
            )
            .with_table(index),
        );
    }

    for (r, row) in rows_of(table).enumerate() {
        for (c, cell) in cells_of(row).enumerate() {
            for warning in span_warnings(cell) {
                let mut diag = Diagnostic::new(DiagnosticLevel::Warning, warning.message)
                    .with_table(index)
                    .with_cell(r as u32 + 1, c as u32 + 1)
                    .with_source(opening_tag(cell));
                if let Some(suggestion) = warning.suggestion {
                    diag = diag.with_suggestion(suggestion);
                }
                result.add(diag);
            }
        }
    }

    let nested = nested_tables(table).len();
    if nested > 1 {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                format!("{} tables are nested directly in this table", nested),
            )
            .with_table(index),
        );
    }
}

/// The start tag of `el`, for source excerpts
fn opening_tag(el: ElementRef<'_>) -> String {
    let mut tag = format!("<{}", el.value().name());
    for (name, value) in el.value().attrs() {
        tag.push_str(&format!(" {}=\"{}\"", name, value));
    }
    tag.push('>');
    tag
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_table() {
        let result = check_html("<table><colgroup><col><col></colgroup><tr><td>a</td><td>b</td></tr></table>");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.tables, 1);
    }

    #[test]
    fn test_nested_table_warns() {
        let result = check_html(
            "<table><tr><td>a<table><tr><td>x</td></tr></table></td></tr></table>",
        );
        assert_eq!(result.tables, 2);
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].table, Some(2));
        assert!(result.diagnostics[0].message.contains("table 1"));
    }

    #[test]
    fn test_partial_columns_noted() {
        let result = check_html(
            "<table><colgroup><col></colgroup><tr><td>a</td><td>b</td><td>c</td></tr></table>",
        );
        assert_eq!(result.infos, 1);
        assert!(result.diagnostics[0].message.contains("2 will be added"));
    }

    #[test]
    fn test_invalid_span_located() {
        let result = check_html("<table><tr><td>a</td><td colspan=\"two\">b</td></tr></table>");
        assert_eq!(result.warnings, 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.cell, Some((1, 2)));
        assert_eq!(diag.source_text.as_deref(), Some("<td colspan=\"two\">"));
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.tables = 1;
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 table checked"));
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
    }
}
