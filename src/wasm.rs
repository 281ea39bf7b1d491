//! WASM bindings for tablemend
//!
//! This module provides JavaScript-accessible functions for converting
//! pasted HTML to reconciled table deltas.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{html_to_delta_with_diagnostics, Delta, ReconcileOptions};

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The reconciled delta
    pub delta: Delta,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Repairs made during conversion
    pub warnings: Vec<String>,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert pasted HTML to a delta
///
/// # Arguments
/// * `html` - Clipboard HTML
/// * `options` - `{ table: { tableInTableError }, maxRepairDepth }`, may be undefined
///
/// # Returns
/// `{ delta, success, error, warnings }`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "convertHtml")]
pub fn convert_html_wasm(html: &str, options: JsValue) -> JsValue {
    let parsed = if options.is_undefined() || options.is_null() {
        Ok(ReconcileOptions::default())
    } else {
        serde_wasm_bindgen::from_value::<ReconcileOptions>(options)
    };

    let result = match parsed {
        Ok(opts) => {
            let output = html_to_delta_with_diagnostics(html, &opts);
            ConvertResult {
                delta: output.delta,
                success: true,
                error: None,
                warnings: output.warnings.iter().map(|w| w.to_string()).collect(),
            }
        }
        Err(e) => ConvertResult {
            delta: Delta::new(),
            success: false,
            error: Some(format!("Invalid options: {}", e)),
            warnings: vec![],
        },
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
