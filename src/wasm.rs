//! Browser entry points. Results come back as plain JS arrays of hex strings.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::color::HexColor;
use crate::export;
use crate::extract::{self, ExtractOptions};
use crate::swatches::Palette;

fn to_js(palette: &Palette) -> Array {
    let out = Array::new();
    for hex in palette.to_hex_strings() {
        out.push(&JsValue::from_str(&hex));
    }
    out
}

fn from_js(values: &Array) -> Result<Palette, JsValue> {
    let mut colors = Vec::new();
    for val in values.iter() {
        let s = val
            .as_string()
            .ok_or_else(|| JsValue::from_str("Palette values must be strings"))?;
        let color = s.parse::<HexColor>().map_err(|e| JsValue::from_str(&e.to_string()))?;
        colors.push(color);
    }
    Palette::new(colors).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode `input` and return up to `n_colors` dominant colors.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    sample_size: Option<u32>,
) -> Result<Array, JsValue> {
    let defaults = ExtractOptions::default();
    let opts = ExtractOptions {
        n_colors,
        sample_size: sample_size.unwrap_or(defaults.sample_size),
        ..defaults
    };
    let palette = extract::extract_palette_bytes(&input, &opts)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(to_js(&palette))
}

#[wasm_bindgen(js_name = randomPalette)]
pub fn random_palette() -> Array {
    to_js(&Palette::random(&mut rand::rng()))
}

/// Serialize hex strings into the `{"palette": [...]}` export layout.
#[wasm_bindgen(js_name = paletteToJson)]
pub fn palette_to_json(values: Array) -> Result<String, JsValue> {
    let palette = from_js(&values)?;
    export::to_json(&palette).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `true` when a label on `hex` should be white.
#[wasm_bindgen(js_name = isDark)]
pub fn is_dark(hex: &str) -> Result<bool, JsValue> {
    let color = hex.parse::<HexColor>().map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(color.is_dark())
}
