//! HTML to delta conversion
//!
//! A small clipboard converter in the style of rich-text editors: the tree
//! is walked depth first, each element's children are converted, then the
//! element's matchers rewrite the children's delta. Table elements are
//! handed to [`TableMatcher`].
//!
//! Only what table reconciliation needs is modelled: line breaks, block
//! boundaries, a handful of inline formats, images and column markers.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use tracing::trace;

use crate::core::delta::{Attributes, Delta, Op};
use crate::core::host::{HtmlToDelta, PassContext};
use crate::core::options::ReconcileOptions;
use crate::core::reconcile::TableMatcher;
use crate::data::constants::{BLOCK_TAGS, IGNORED_TAGS, TABLE_PART_TAGS};
use crate::utils::css::InlineStyle;
use crate::utils::error::ConversionOutput;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Converter from pasted HTML to a reconciled delta
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    options: ReconcileOptions,
}

impl Clipboard {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Convert `html`, collecting repair warnings
    pub fn convert(&self, html: &str) -> ConversionOutput {
        let mut ctx = PassContext::new();
        let delta = self.convert_html(html, &mut ctx);
        ConversionOutput::with_warnings(delta, ctx.into_warnings())
    }

    fn convert_children(
        &self,
        parent: ElementRef<'_>,
        matcher: &TableMatcher<'_, Self>,
        ctx: &mut PassContext,
    ) -> Delta {
        let mut delta = Delta::new();
        for child in parent.children() {
            match child.value() {
                Node::Text(text) if text.trim().is_empty() => {
                    let prev = child.prev_siblings().map(|n| n.value()).find(|n| is_content(n));
                    let next = child.next_siblings().map(|n| n.value()).find(|n| is_content(n));
                    if is_inline(prev) && is_inline(next) {
                        delta = delta.insert(" ", Attributes::new());
                    }
                }
                Node::Text(text) => delta = delta.concat(text_delta(text)),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        delta = delta.concat(self.convert_element(el, matcher, ctx));
                    }
                }
                _ => {}
            }
        }
        delta
    }

    fn convert_element(
        &self,
        el: ElementRef<'_>,
        matcher: &TableMatcher<'_, Self>,
        ctx: &mut PassContext,
    ) -> Delta {
        let name = el.value().name();
        if IGNORED_TAGS.contains(name) {
            return Delta::new();
        }

        let mut delta = match name {
            "br" => Delta::new().insert("\n", Attributes::new()),
            "col" => Delta::new().insert("\n", Attributes::table_col()),
            "img" => match el.value().attr("src") {
                Some(src) => {
                    Delta::new().insert_embed("image", serde_json::json!(src), Attributes::new())
                }
                None => Delta::new(),
            },
            _ => self.convert_children(el, matcher, ctx),
        };

        let formats = inline_formats(el);
        if !formats.is_empty() {
            delta = apply_inline_formats(&delta, &formats);
        }

        if BLOCK_TAGS.contains(name) && el.has_children() && !delta.ends_with_newline() {
            delta = delta.insert("\n", Attributes::new());
        }

        match name {
            "td" => matcher.match_cell(el, delta, ctx),
            "th" => matcher.match_header(el, delta, ctx),
            "table" => matcher.match_table(el, delta, ctx),
            _ => delta,
        }
    }
}

impl HtmlToDelta for Clipboard {
    fn convert_html(&self, html: &str, ctx: &mut PassContext) -> Delta {
        trace!(depth = ctx.depth(), len = html.len(), "converting html");
        let fragment = Html::parse_fragment(html);
        let matcher = TableMatcher::new(self, &self.options);
        self.convert_children(fragment.root_element(), &matcher, ctx)
    }
}

fn text_delta(text: &str) -> Delta {
    Delta::new().insert(WHITESPACE_RE.replace_all(text, " "), Attributes::new())
}

fn is_content(node: &Node) -> bool {
    node.is_text() || node.is_element()
}

/// Whether whitespace next to `node` separates words.
///
/// Whitespace next to a block, a table part or a line break, or at either
/// end of its parent, is layout and carries no content.
fn is_inline(node: Option<&Node>) -> bool {
    match node {
        Some(Node::Text(_)) => true,
        Some(Node::Element(el)) => !is_layout_boundary(el.name()),
        _ => false,
    }
}

fn is_layout_boundary(name: &str) -> bool {
    name == "br"
        || BLOCK_TAGS.contains(name)
        || TABLE_PART_TAGS.contains(name)
        || IGNORED_TAGS.contains(name)
}

/// Inline formats an element applies to its content
fn inline_formats(el: ElementRef<'_>) -> Attributes {
    let element = el.value();
    let name = element.name();
    let mut attrs = Attributes::new();
    match name {
        "b" | "strong" => attrs.bold = Some(true),
        "i" | "em" => attrs.italic = Some(true),
        "u" => attrs.underline = Some(true),
        "s" | "strike" | "del" => attrs.strike = Some(true),
        "a" => attrs.link = element.attr("href").map(str::to_string),
        _ => {}
    }

    // cell and block styles describe boxes, not text
    if !BLOCK_TAGS.contains(name) && name != "th" {
        if let Some(style) = element.attr("style").map(InlineStyle::parse) {
            attrs.color = style.get("color").map(str::to_string);
            attrs.background = style.background().map(str::to_string);
        }
    }
    attrs
}

/// Fill `formats` into every content op; formats already set on an op win.
fn apply_inline_formats(delta: &Delta, formats: &Attributes) -> Delta {
    delta
        .iter()
        .map(|op| {
            let is_line_break = op.as_text().is_some_and(|t| t.chars().all(|c| c == '\n'));
            if is_line_break {
                op.clone()
            } else {
                Op {
                    insert: op.insert.clone(),
                    attributes: formats.merge(&op.attributes),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(html: &str) -> Delta {
        Clipboard::default().convert(html).delta
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        assert_eq!(
            convert("<p>one</p><p>two<br>three</p>"),
            Delta::new().insert("one\ntwo\nthree\n", Attributes::new())
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(
            convert("<div>\n  a   b\n</div>\n"),
            Delta::new().insert(" a b \n", Attributes::new())
        );
    }

    #[test]
    fn test_space_between_inline_elements_kept() {
        assert_eq!(
            convert("<p><b>a</b> <i>b</i></p>"),
            Delta::new()
                .insert("a", Attributes::new().with_bold())
                .insert(" ", Attributes::new())
                .insert("b", Attributes::new().with_italic())
                .insert("\n", Attributes::new())
        );
    }

    #[test]
    fn test_layout_whitespace_dropped() {
        assert_eq!(
            convert("<div> <p>a</p>\n <p>b<br> </p> </div>"),
            Delta::new().insert("a\nb\n", Attributes::new())
        );
        assert_eq!(
            convert("<table>\n <tr> <th>h</th> <td>c</td> </tr>\n</table>"),
            convert("<table><tr><th>h</th><td>c</td></tr></table>")
        );
    }

    #[test]
    fn test_inline_formats() {
        let out = convert(
            "<p><b>bold <i>both</i></b> and <span style=\"background-color: #ff0\">hi</span></p>",
        );
        assert_eq!(
            out,
            Delta::new()
                .insert("bold ", Attributes::new().with_bold())
                .insert("both", Attributes::new().with_bold().with_italic())
                .insert(" and ", Attributes::new())
                .insert("hi", Attributes::new().with_background("#ff0"))
                .insert("\n", Attributes::new())
        );
    }

    #[test]
    fn test_images_are_embeds() {
        let out = convert("<p><img src=\"a.png\"></p>");
        assert_eq!(out.ops().len(), 2);
        assert_eq!(out.ops()[0].len(), 1);
    }

    #[test]
    fn test_scripts_ignored() {
        assert!(convert("<style>td{}</style><script>x()</script>").is_empty());
    }
}
