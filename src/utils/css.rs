//! Inline `style` attribute parsing

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One `property: value` declaration
    static ref DECLARATION_RE: Regex =
        Regex::new(r"(?s)([A-Za-z-]+)\s*:\s*([^;]*)").unwrap();
}

/// Declarations of an inline style, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(style: &str) -> Self {
        let declarations = DECLARATION_RE
            .captures_iter(style)
            .filter_map(|caps| {
                let value = caps[2].trim();
                if value.is_empty() {
                    return None;
                }
                Some((caps[1].to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    /// Value of the last declaration of `property`
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Background color, from `background-color` or the `background` shorthand
    pub fn background(&self) -> Option<&str> {
        self.get("background-color").or_else(|| self.get("background"))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let style = InlineStyle::parse("color: red; Background-Color : rgb(1, 2, 3);border:1px solid #000");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.background(), Some("rgb(1, 2, 3)"));
        assert_eq!(style.get("border"), Some("1px solid #000"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let style = InlineStyle::parse("background: #fff; background: #000;");
        assert_eq!(style.background(), Some("#000"));
        assert!(InlineStyle::parse("  ;; ").is_empty());
    }
}
