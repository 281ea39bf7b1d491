//! Structural coordinates of a table cell

use scraper::ElementRef;

use crate::core::delta::TableCellLine;
use crate::data::constants::{
    DATA_CELL_BG, DATA_CELL_BORDER, MAX_COLSPAN, MAX_ROWSPAN, ROW_GROUP_TAGS,
};
use crate::utils::css::InlineStyle;
use crate::utils::error::{ConversionWarning, WarningKind};

/// A `colspan`/`rowspan` value; absent means 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span(Option<u32>);

/// Span text that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpan {
    pub raw: String,
}

impl Span {
    pub fn explicit(value: u32) -> Self {
        Span(Some(value))
    }

    /// Effective span
    pub fn get(self) -> u32 {
        self.0.unwrap_or(1)
    }

    /// The value as written in the source, if any
    pub fn as_written(self) -> Option<u32> {
        self.0
    }

    /// Parse an attribute value as a base-10 positive integer.
    ///
    /// Values above `limit` are clamped to it. Zero, signs and any
    /// non-digit character are rejected.
    pub fn parse(raw: Option<&str>, limit: u32) -> Result<Span, InvalidSpan> {
        let Some(raw) = raw else {
            return Ok(Span(None));
        };
        let digits = raw.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSpan {
                raw: raw.to_string(),
            });
        }
        // only overflow can fail once the text is all digits
        let value = u64::from_str_radix(digits, 10).unwrap_or(u64::MAX);
        if value == 0 {
            return Err(InvalidSpan {
                raw: raw.to_string(),
            });
        }
        Ok(Span(Some(value.min(u64::from(limit)) as u32)))
    }

    fn of(cell: ElementRef<'_>, attr: &str, limit: u32) -> Span {
        Span::parse(cell.value().attr(attr), limit).unwrap_or_default()
    }
}

/// `(row, cell, colspan, rowspan)` of a cell, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub row: u32,
    pub cell: u32,
    pub colspan: Span,
    pub rowspan: Span,
}

impl CellPosition {
    pub fn new(row: u32, cell: u32) -> Self {
        Self {
            row,
            cell,
            colspan: Span::default(),
            rowspan: Span::default(),
        }
    }

    /// Resolve the position of a `td`/`th` from its ancestry.
    ///
    /// Invalid spans fall back to 1. Returns `None` when the cell has no
    /// row inside a table.
    pub fn resolve(cell: ElementRef<'_>) -> Option<CellPosition> {
        let row = cell.parent().and_then(ElementRef::wrap)?;
        let table = owning_table(row)?;
        let row_index = rows_of(table).position(|r| r.id() == row.id())?;
        let cell_index = cells_of(row).position(|c| c.id() == cell.id())?;

        Some(CellPosition {
            row: row_index as u32 + 1,
            cell: cell_index as u32 + 1,
            colspan: Span::of(cell, "colspan", MAX_COLSPAN),
            rowspan: Span::of(cell, "rowspan", MAX_ROWSPAN),
        })
    }

    /// The `table-cell-line` value for this position, without style
    pub fn cell_line(&self) -> TableCellLine {
        TableCellLine::new(self.row, self.cell)
            .with_spans(self.rowspan.as_written(), self.colspan.as_written())
    }
}

/// Warnings for span attributes of `cell` that were replaced by 1
pub fn span_warnings(cell: ElementRef<'_>) -> Vec<ConversionWarning> {
    [("colspan", MAX_COLSPAN), ("rowspan", MAX_ROWSPAN)]
        .into_iter()
        .filter_map(|(attr, limit)| {
            Span::parse(cell.value().attr(attr), limit).err().map(|invalid| {
                ConversionWarning::new(
                    WarningKind::InvalidSpan,
                    format!("{}=\"{}\" is not a positive integer", attr, invalid.raw),
                )
                .with_suggestion("treated as 1")
            })
        })
        .collect()
}

/// Background and border a cell carries into its lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub background: Option<String>,
    pub border: Option<String>,
}

impl CellStyle {
    /// Editor-written data attributes win over the inline style, which is
    /// all an external table has.
    pub fn resolve(cell: ElementRef<'_>) -> Self {
        let el = cell.value();
        let style = el.attr("style").map(InlineStyle::parse).unwrap_or_default();
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

        Self {
            background: el
                .attr(DATA_CELL_BG)
                .and_then(non_empty)
                .or_else(|| style.background().and_then(non_empty)),
            border: el
                .attr(DATA_CELL_BORDER)
                .and_then(non_empty)
                .or_else(|| style.get("border").and_then(non_empty)),
        }
    }
}

pub fn is_cell(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "td" | "th")
}

/// The table a row belongs to, looking through one row group
pub fn owning_table(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let parent = row.parent().and_then(ElementRef::wrap)?;
    match parent.value().name() {
        "table" => Some(parent),
        name if ROW_GROUP_TAGS.contains(name) => parent
            .parent()
            .and_then(ElementRef::wrap)
            .filter(|t| t.value().name() == "table"),
        _ => None,
    }
}

/// Nearest `table` strictly above `el`
pub fn enclosing_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Rows of `table` in document order, excluding rows of nested tables
pub fn rows_of<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| {
            el.value().name() == "tr"
                && owning_table(*el).is_some_and(|owner| owner.id() == table.id())
        })
}

/// Cells of `row` in document order
pub fn cells_of<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_cell(*el))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn cells(html: &str) -> (Html, Selector) {
        (Html::parse_fragment(html), Selector::parse("td, th").unwrap())
    }

    #[test]
    fn test_positions_through_tbody() {
        let (doc, sel) = cells(
            "<table><tr><th>a</th><td>b</td></tr><tr><td>c</td><td colspan=\"2\">d</td></tr></table>",
        );
        let positions: Vec<_> = doc
            .select(&sel)
            .map(|c| CellPosition::resolve(c).unwrap())
            .map(|p| (p.row, p.cell, p.colspan.get()))
            .collect();
        assert_eq!(positions, vec![(1, 1, 1), (1, 2, 1), (2, 1, 1), (2, 2, 2)]);
    }

    #[test]
    fn test_nested_rows_are_not_counted() {
        let (doc, _) = cells(
            "<table><tr><td><table><tr><td>x</td></tr><tr><td>y</td></tr></table></td></tr>\
             <tr><td id=\"z\">z</td></tr></table>",
        );
        let z = doc.select(&Selector::parse("#z").unwrap()).next().unwrap();
        let pos = CellPosition::resolve(z).unwrap();
        assert_eq!((pos.row, pos.cell), (2, 1));
    }

    #[test]
    fn test_span_parsing() {
        assert_eq!(Span::parse(None, 10), Ok(Span::default()));
        assert_eq!(Span::parse(Some(" 3 "), 10), Ok(Span::explicit(3)));
        assert_eq!(Span::parse(Some("5000"), 1000), Ok(Span::explicit(1000)));
        assert!(Span::parse(Some("abc"), 10).is_err());
        assert!(Span::parse(Some("0"), 10).is_err());
        assert!(Span::parse(Some("-2"), 10).is_err());
        assert_eq!(Span::parse(Some("2px"), 10).unwrap_or_default().get(), 1);
    }

    #[test]
    fn test_invalid_span_warns_and_defaults() {
        let (doc, sel) = cells("<table><tr><td colspan=\"wide\">a</td></tr></table>");
        let td = doc.select(&sel).next().unwrap();
        assert_eq!(CellPosition::resolve(td).unwrap().colspan, Span::default());
        let warnings = span_warnings(td);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidSpan);
    }

    #[test]
    fn test_style_prefers_data_attributes() {
        let (doc, sel) = cells(
            "<table><tr>\
             <td data-cell-bg=\"#ff0000\" style=\"background-color: blue; border: 1px solid red\">a</td>\
             <td style=\"background: rgb(0, 0, 255)\">b</td>\
             <td>c</td></tr></table>",
        );
        let styles: Vec<_> = doc.select(&sel).map(CellStyle::resolve).collect();
        assert_eq!(styles[0].background.as_deref(), Some("#ff0000"));
        assert_eq!(styles[0].border.as_deref(), Some("1px solid red"));
        assert_eq!(styles[1].background.as_deref(), Some("rgb(0, 0, 255)"));
        assert_eq!(styles[2], CellStyle::default());
    }
}
