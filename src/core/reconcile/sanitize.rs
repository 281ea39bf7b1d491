//! Removal of routing-only attribute keys

use crate::core::delta::{AttrKey, Attributes};
use crate::data::colors::same_color;

/// Keys used only to route metadata between matchers
pub const TRANSIENT_KEYS: &[AttrKey] = &[AttrKey::Table, AttrKey::TableCellLine];

/// Copy of `attrs` without transient keys
pub fn sanitize(attrs: &Attributes) -> Attributes {
    attrs.omit(TRANSIENT_KEYS)
}

/// Drop an inline `background` that only repeats the cell background.
pub fn strip_background_collision(attrs: Attributes, cell_background: Option<&str>) -> Attributes {
    match (attrs.background.as_deref(), cell_background) {
        (Some(own), Some(cell)) if same_color(own, cell) => attrs.omit(&[AttrKey::Background]),
        _ => attrs,
    }
}
