//! Data layer - Static mappings and constants
//!
//! - CSS named colors and color normalization
//! - HTML tag sets and table limits

pub mod colors;
pub mod constants;

// Re-export commonly used items
pub use colors::{same_color, to_hex, NAMED_COLORS};
pub use constants::{BLOCK_TAGS, IGNORED_TAGS, MAX_COLSPAN, MAX_ROWSPAN, ROW_GROUP_TAGS};
