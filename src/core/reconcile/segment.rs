//! Line segmentation of a single operation

use crate::core::delta::{Insert, Op};

/// One piece of a segmented op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A single `\n`
    Terminator,
    /// Text without any newline
    Text(&'a str),
    /// An embed, never split
    Embed(&'a Insert),
}

/// Split `op` so every `\n` becomes its own [`Segment::Terminator`].
pub fn segment(op: &Op) -> Vec<Segment<'_>> {
    let text = match &op.insert {
        Insert::Text(text) => text,
        Insert::Embed(_) => return vec![Segment::Embed(&op.insert)],
    };

    let mut segments = Vec::new();
    for piece in text.split_inclusive('\n') {
        match piece.strip_suffix('\n') {
            Some(line) => {
                if !line.is_empty() {
                    segments.push(Segment::Text(line));
                }
                segments.push(Segment::Terminator);
            }
            None => segments.push(Segment::Text(piece)),
        }
    }
    segments
}
