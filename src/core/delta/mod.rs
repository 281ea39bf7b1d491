//! Delta document model
//!
//! A [`Delta`] is an ordered sequence of insert operations. Construction
//! always normalizes: empty text is dropped and adjacent text runs with
//! equal attributes merge, so two deltas are equal exactly when their
//! normalized operation lists are. Transforms never edit a delta in place;
//! they build a new one.

mod attributes;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use attributes::{AttrKey, Attributes, TableCellLine, TableTag, TABLE_KEYS};

/// Payload of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    /// Embedded object such as `{"image": "…"}`
    Embed(BTreeMap<String, serde_json::Value>),
}

/// A single insert with its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Op {
    pub insert: Insert,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Op {
    pub fn text(text: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes,
        }
    }

    pub fn embed(kind: impl Into<String>, value: serde_json::Value, attributes: Attributes) -> Self {
        let mut map = BTreeMap::new();
        map.insert(kind.into(), value);
        Self {
            insert: Insert::Embed(map),
            attributes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.insert {
            Insert::Text(text) => Some(text),
            Insert::Embed(_) => None,
        }
    }

    /// Document length: characters for text, 1 for an embed
    pub fn len(&self) -> usize {
        match &self.insert {
            Insert::Text(text) => text.chars().count(),
            Insert::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of line terminators in this op
    pub fn newline_count(&self) -> usize {
        self.as_text().map_or(0, |t| t.matches('\n').count())
    }
}

/// Ordered, normalized sequence of operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DeltaRepr")]
pub struct Delta {
    ops: Vec<Op>,
}

#[derive(Deserialize)]
struct DeltaRepr {
    #[serde(default)]
    ops: Vec<Op>,
}

impl From<DeltaRepr> for Delta {
    fn from(repr: DeltaRepr) -> Self {
        repr.ops.into_iter().collect()
    }
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text insert
    pub fn insert(mut self, text: impl Into<String>, attributes: Attributes) -> Self {
        self.push(Op::text(text, attributes));
        self
    }

    /// Append an embedded object
    pub fn insert_embed(
        mut self,
        kind: impl Into<String>,
        value: serde_json::Value,
        attributes: Attributes,
    ) -> Self {
        self.push(Op::embed(kind, value, attributes));
        self
    }

    /// Append an op, merging it into the previous one when possible
    pub(crate) fn push(&mut self, op: Op) {
        if let Insert::Text(ref text) = op.insert {
            if text.is_empty() {
                return;
            }
        }
        if let Some(last) = self.ops.last_mut() {
            if last.attributes == op.attributes {
                if let (Insert::Text(prev), Insert::Text(next)) = (&mut last.insert, &op.insert) {
                    prev.push_str(next);
                    return;
                }
            }
        }
        self.ops.push(op);
    }

    pub fn concat(mut self, other: Delta) -> Delta {
        for op in other.ops {
            self.push(op);
        }
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    /// Document length of the whole delta
    pub fn len(&self) -> usize {
        self.ops.iter().map(Op::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ends_with_newline(&self) -> bool {
        self.ops
            .last()
            .and_then(Op::as_text)
            .is_some_and(|t| t.ends_with('\n'))
    }

    /// Count line terminators whose attributes satisfy `pred`
    pub fn newline_count_where(&self, pred: impl Fn(&Attributes) -> bool) -> usize {
        self.ops
            .iter()
            .filter(|op| pred(&op.attributes))
            .map(Op::newline_count)
            .sum()
    }

    /// Rebuild the delta with every op's attributes passed through `f`
    pub fn map_attributes(&self, f: impl Fn(&Attributes) -> Attributes) -> Delta {
        self.ops
            .iter()
            .map(|op| Op {
                insert: op.insert.clone(),
                attributes: f(&op.attributes),
            })
            .collect()
    }

    /// Concatenated text of all text inserts
    pub fn plain_text(&self) -> String {
        self.ops.iter().filter_map(Op::as_text).collect()
    }
}

impl FromIterator<Op> for Delta {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        let mut delta = Delta::new();
        for op in iter {
            delta.push(op);
        }
        delta
    }
}

impl IntoIterator for Delta {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
