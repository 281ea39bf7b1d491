use std::cell::RefCell;

use pretty_assertions::assert_eq;
use scraper::{Html, Selector};

use super::*;
use crate::core::clipboard::Clipboard;
use crate::core::delta::{Attributes, TableCellLine};
use crate::utils::error::WarningKind;

/// Records what the matcher asks it to convert
#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<(String, usize)>>,
}

impl HtmlToDelta for Recorder {
    fn convert_html(&self, html: &str, ctx: &mut PassContext) -> Delta {
        self.calls.borrow_mut().push((html.to_string(), ctx.depth()));
        Delta::new().insert("repaired\n", Attributes::new())
    }
}

fn first<'a>(doc: &'a Html, selector: &str) -> ElementRef<'a> {
    doc.select(&Selector::parse(selector).unwrap()).next().unwrap()
}

fn line(row: u32, cell: u32) -> Attributes {
    Attributes::cell_line(TableCellLine::new(row, cell))
}

#[test]
fn test_match_cell_uses_structural_position() {
    let doc = Html::parse_fragment("<table><tr><td>a</td></tr><tr><td>b</td><td>c</td></tr></table>");
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let td = doc
        .select(&Selector::parse("td").unwrap())
        .nth(2)
        .unwrap();
    let out = matcher.match_cell(td, Delta::new().insert("c\n", Attributes::new()), &mut ctx);
    assert_eq!(
        out,
        Delta::new()
            .insert("c", Attributes::new())
            .insert("\n", line(2, 2).with_row(2))
    );
    assert!(ctx.warnings().is_empty());
}

#[test]
fn test_match_cell_reports_invalid_spans() {
    let doc = Html::parse_fragment("<table><tr><td colspan=\"-2\" rowspan=\"x\">a</td></tr></table>");
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let out = matcher.match_cell(first(&doc, "td"), Delta::new(), &mut ctx);
    assert_eq!(out, Delta::new().insert("\n", line(1, 1)));
    assert_eq!(ctx.warnings().len(), 2);
    assert!(ctx
        .warnings()
        .iter()
        .all(|w| w.kind == WarningKind::InvalidSpan));
}

#[test]
fn test_match_header_is_plain_cell() {
    let doc = Html::parse_fragment(
        "<table><tr><th style=\"background-color: red\">Name</th></tr></table>",
    );
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let out = matcher.match_header(
        first(&doc, "th"),
        Delta::new().insert("Name", Attributes::new()),
        &mut ctx,
    );
    assert_eq!(
        out,
        Delta::new()
            .insert("Name", Attributes::new())
            .insert("\n", line(1, 1))
    );
}

#[test]
fn test_match_table_synthesizes_columns_and_consumes_row() {
    let doc = Html::parse_fragment(
        "<table><tr><td colspan=\"2\">a</td><td>b</td><td>c</td></tr></table>",
    );
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let delta = Delta::new()
        .insert("a", Attributes::new())
        .insert("\n", line(1, 1).with_row(1));
    let out = matcher.match_table(first(&doc, "table"), delta, &mut ctx);
    assert_eq!(
        out,
        Delta::new()
            .insert("\n\n\n\n", Attributes::table_col())
            .insert("a", Attributes::new())
            .insert("\n", line(1, 1))
    );
    assert!(recorder.calls.borrow().is_empty());
}

#[test]
fn test_match_table_extra_columns_warns() {
    let doc = Html::parse_fragment(
        "<table><colgroup><col><col><col></colgroup><tr><td>a</td></tr></table>",
    );
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let delta = Delta::new()
        .insert("\n\n\n", Attributes::table_col())
        .insert("a\n", line(1, 1));
    let out = matcher.match_table(first(&doc, "table"), delta.clone(), &mut ctx);
    assert_eq!(out, delta);
    assert_eq!(ctx.warnings()[0].kind, WarningKind::ExtraColumns);
}

#[test]
fn test_match_table_without_rows_is_empty() {
    let doc = Html::parse_fragment("<table></table>");
    let options = ReconcileOptions::default();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let out = matcher.match_table(first(&doc, "table"), Delta::new(), &mut ctx);
    assert!(out.is_empty());
}

#[test]
fn test_broken_table_is_reconverted_one_level_deeper() {
    let doc = Html::parse_fragment(
        "<table><tr><td>a<table><tr><td>x</td></tr></table></td></tr></table>",
    );
    let options = ReconcileOptions::default().with_table_in_table_error("Moved:");
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let broken = Delta::new().insert("\n", Attributes::table_col().with_row(1));
    let out = matcher.match_table(first(&doc, "table"), broken, &mut ctx);

    assert_eq!(out, Delta::new().insert("repaired\n", Attributes::new()));
    let calls = recorder.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, 1);
    assert!(calls[0].0.contains("<br>Moved:<table>"));
    assert_eq!(ctx.depth(), 0);
    assert_eq!(ctx.warnings()[0].kind, WarningKind::NestedTable);
}

#[test]
fn test_repair_fails_closed_at_depth_limit() {
    let doc = Html::parse_fragment(
        "<table><tr><td>a<table><tr><td>x</td></tr></table></td></tr></table>",
    );
    let options = ReconcileOptions::strict();
    let recorder = Recorder::default();
    let matcher = TableMatcher::new(&recorder, &options);
    let mut ctx = PassContext::new();

    let broken = Delta::new()
        .insert("a", Attributes::new())
        .insert("\n", Attributes::table_col().with_row(1))
        .insert("x\n", line(1, 1).with_row(1));
    let out = matcher.match_table(first(&doc, "table"), broken, &mut ctx);

    assert_eq!(out, Delta::new().insert("a\nx\n", Attributes::new()));
    assert!(recorder.calls.borrow().is_empty());
    assert_eq!(ctx.warnings()[0].kind, WarningKind::RepairDepthExceeded);
}

#[test]
fn test_clipboard_repairs_nested_table_end_to_end() {
    let clipboard = Clipboard::new(ReconcileOptions::default());
    let out = clipboard.convert(
        "<table><tr><td>a<table><tr><td>x</td><td>y</td></tr></table></td><td>b</td></tr></table>",
    );

    assert!(!is_broken(&out.delta));
    assert!(out.delta.iter().all(|op| op.attributes.row.is_none()));
    // outer and inner table each get two markers
    assert_eq!(out.delta.newline_count_where(Attributes::is_table_col), 4);
    assert_eq!(out.delta.plain_text().replace('\n', ""), "abxy");
    assert!(out
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::NestedTable));
}

#[test]
fn test_clipboard_repairs_table_nested_in_header() {
    let clipboard = Clipboard::new(ReconcileOptions::default());
    let out = clipboard.convert(
        "<table><tr><th>h<table><tr><td>x</td><td>y</td></tr></table></th><td>b</td></tr></table>",
    );

    assert!(!is_broken(&out.delta));
    assert_eq!(out.delta.newline_count_where(Attributes::is_table_col), 4);
    assert_eq!(out.delta.plain_text().replace('\n', ""), "hbxy");
    assert!(out
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::NestedTable));
}
