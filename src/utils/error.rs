//! Error handling for Tablemend
//!
//! Reconciliation itself never fails: malformed tables are normalized and
//! reported as [`ConversionWarning`]s. [`ConversionError`] covers the fallible
//! edges around it (configuration, delta JSON, file IO).

use std::fmt;

use crate::core::delta::Delta;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// Configuration could not be parsed
    ConfigError { message: String, format: &'static str },
    /// A delta document could not be decoded
    DeltaError {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },
    /// Invalid input
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::ConfigError { message, format } => {
                write!(f, "Invalid {} configuration: {}", format, message)
            }
            ConversionError::DeltaError {
                message,
                line,
                column,
            } => {
                if let (Some(l), Some(c)) = (line, column) {
                    write!(f, "Delta error at line {}, column {}: {}", l, c, message)
                } else {
                    write!(f, "Delta error: {}", message)
                }
            }
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::DeltaError {
            message: err.to_string(),
            line: Some(err.line()),
            column: Some(err.column()),
        }
    }
}

/// Result type for fallible operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// What kind of repair a warning reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A table nested inside a cell was moved after its parent table
    NestedTable,
    /// Nested-table repair hit the depth limit; the table was flattened to text
    RepairDepthExceeded,
    /// A colspan/rowspan attribute could not be used as written
    InvalidSpan,
    /// The source declares more `<col>` elements than its first row needs
    ExtraColumns,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::NestedTable => write!(f, "nested-table"),
            WarningKind::RepairDepthExceeded => write!(f, "repair-depth"),
            WarningKind::InvalidSpan => write!(f, "invalid-span"),
            WarningKind::ExtraColumns => write!(f, "extra-columns"),
        }
    }
}

/// Conversion warnings (non-fatal repairs)
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning [{}]: {}", self.kind, self.message)?;
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The reconciled delta
    pub delta: Delta,
    /// Repairs made while producing it
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(delta: Delta) -> Self {
        Self {
            delta,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(delta: Delta, warnings: Vec<ConversionWarning>) -> Self {
        Self { delta, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// Convenience constructors for errors
impl ConversionError {
    pub fn config(format: &'static str, message: impl Into<String>) -> Self {
        ConversionError::ConfigError {
            message: message.into(),
            format,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }
}
