//! Typed attribute records
//!
//! Every attribute key the engine understands has its own field. Merging
//! and omission go through [`AttrKey`], so a key is only ever copied or
//! dropped on purpose. Keys the engine does not know are ignored when a
//! delta is decoded.

use serde::{Deserialize, Serialize};

/// Identity and style of the table cell that owns a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCellLine {
    pub row: u32,
    pub cell: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
    #[serde(
        rename = "cell-background",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cell_background: Option<String>,
    #[serde(rename = "cell-border", default, skip_serializing_if = "Option::is_none")]
    pub cell_border: Option<String>,
}

impl TableCellLine {
    pub fn new(row: u32, cell: u32) -> Self {
        Self {
            row,
            cell,
            rowspan: None,
            colspan: None,
            cell_background: None,
            cell_border: None,
        }
    }

    pub fn with_spans(mut self, rowspan: Option<u32>, colspan: Option<u32>) -> Self {
        self.rowspan = rowspan;
        self.colspan = colspan;
        self
    }

    pub fn with_style(mut self, background: Option<String>, border: Option<String>) -> Self {
        self.cell_background = background.filter(|s| !s.is_empty());
        self.cell_border = border.filter(|s| !s.is_empty());
        self
    }
}

/// The transient `table` group a row tags onto its content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
}

/// Attribute record carried by an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(
        rename = "table-cell-line",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub table_cell_line: Option<TableCellLine>,
    #[serde(rename = "table-col", default, skip_serializing_if = "Option::is_none")]
    pub table_col: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableTag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

macro_rules! attribute_keys {
    ($($key:ident => $field:ident : $wire:literal),* $(,)?) => {
        /// Names of the attribute keys an [`Attributes`] record can hold.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AttrKey {
            $($key),*
        }

        impl AttrKey {
            pub const ALL: &'static [AttrKey] = &[$(AttrKey::$key),*];

            /// Key name as it appears on the wire
            pub fn wire_name(self) -> &'static str {
                match self {
                    $(AttrKey::$key => $wire),*
                }
            }
        }

        impl Attributes {
            fn clear(&mut self, key: AttrKey) {
                match key {
                    $(AttrKey::$key => self.$field = None),*
                }
            }

            /// Whether `key` is set
            pub fn contains(&self, key: AttrKey) -> bool {
                match key {
                    $(AttrKey::$key => self.$field.is_some()),*
                }
            }

            /// Key-wise union; values set in `over` win.
            pub fn merge(&self, over: &Attributes) -> Attributes {
                Attributes {
                    $($field: over.$field.clone().or_else(|| self.$field.clone())),*
                }
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

attribute_keys! {
    TableCellLine => table_cell_line: "table-cell-line",
    TableCol => table_col: "table-col",
    Row => row: "row",
    Table => table: "table",
    Bold => bold: "bold",
    Italic => italic: "italic",
    Underline => underline: "underline",
    Strike => strike: "strike",
    Color => color: "color",
    Background => background: "background",
    Link => link: "link",
    Font => font: "font",
    Size => size: "size",
}

/// Keys that only describe table structure.
pub const TABLE_KEYS: &[AttrKey] = &[
    AttrKey::TableCellLine,
    AttrKey::TableCol,
    AttrKey::Row,
    AttrKey::Table,
];

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `self` without `keys`.
    pub fn omit(&self, keys: &[AttrKey]) -> Attributes {
        let mut out = self.clone();
        for key in keys {
            out.clear(*key);
        }
        out
    }

    /// Attributes of a `table-col` marker line
    pub fn table_col() -> Self {
        Self {
            table_col: Some(true),
            ..Self::default()
        }
    }

    /// Attributes of a line owned by a table cell
    pub fn cell_line(line: TableCellLine) -> Self {
        Self {
            table_cell_line: Some(line),
            ..Self::default()
        }
    }

    /// True when this record is a column marker
    pub fn is_table_col(&self) -> bool {
        self.table_col == Some(true)
    }

    /// The co-occurrence that only a nested table can produce
    pub fn is_broken_table_signal(&self) -> bool {
        self.row.is_some() && self.table_col.is_some()
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_row(mut self, row: u32) -> Self {
        self.row = Some(row);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_omit_removes_only_named_keys() {
        let attrs = Attributes {
            table: Some(TableTag { row: Some(2) }),
            table_cell_line: Some(TableCellLine::new(1, 1)),
            bold: Some(true),
            ..Default::default()
        };
        let out = attrs.omit(&[AttrKey::Table, AttrKey::TableCellLine]);
        assert_eq!(out, Attributes::new().with_bold());
        // source untouched
        assert!(attrs.contains(AttrKey::Table));
    }

    #[test]
    fn test_merge_prefers_over() {
        let base = Attributes::new().with_bold().with_background("#fff");
        let over = Attributes::new().with_background("#000");
        let merged = base.merge(&over);
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.background.as_deref(), Some("#000"));
    }

    #[test]
    fn test_wire_names() {
        let attrs = Attributes::cell_line(
            TableCellLine::new(1, 2)
                .with_spans(None, Some(2))
                .with_style(Some("#ff0000".into()), Some(String::new())),
        );
        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "table-cell-line": {"row": 1, "cell": 2, "colspan": 2, "cell-background": "#ff0000"}
            })
        );
        assert_eq!(AttrKey::TableCol.wire_name(), "table-col");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"bold": true, "x-custom": 3, "table-col": true}"#).unwrap();
        assert_eq!(attrs.bold, Some(true));
        assert!(attrs.is_table_col());
    }

    #[test]
    fn test_broken_signal() {
        let attrs = Attributes::table_col().with_row(1);
        assert!(attrs.is_broken_table_signal());
        assert!(!Attributes::table_col().is_broken_table_signal());
        assert_eq!(AttrKey::ALL.len(), 13);
    }
}
