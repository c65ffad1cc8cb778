//! Browser entry point: render a figure saved with [`Figure::save_json`] into a
//! canvas.
//!
//! Only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::prelude::*;

use crate::core::Figure;
use crate::runtime::run_figure;

/// Parse a figure from JSON and start drawing it into `canvas_id` (without `#`).
#[wasm_bindgen]
pub fn show_figure(json: &str, canvas_id: &str) -> Result<(), JsValue> {
    let figure = Figure::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("failed to parse figure JSON: {e:?}")))?;
    run_figure(figure, canvas_id);
    Ok(())
}
