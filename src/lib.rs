//! Converts GPX waypoints into GeoJSON marker collections for web maps.
//!
//! Waypoints are grouped by their `<type>`, each type gets a marker color
//! from a palette, and one reserved type (`"Mileage"` by default) is left
//! out. The pipeline is available natively ([`batch::convert_batch`]) and as
//! WebAssembly entry points.

pub mod batch;
pub mod converter;
pub mod error;
pub mod gpx_types;
pub mod options;
pub mod parser;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::options::ConvertOptions;

pub use crate::batch::{convert_batch, convert_file};
pub use crate::converter::to_feature_collection;
pub use crate::parser::{load_gpx, parse_gpx};

/// Convert GPX string to GeoJSON, returned as a JS object.
#[wasm_bindgen(js_name = gpxToGeoJson)]
pub fn gpx_to_geojson(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let doc = parser::parse_gpx(gpx_string)?;
    let fc = converter::to_feature_collection(&doc, &opts);
    // Plain JS objects with null properties kept, as JSON.parse would give.
    fc.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert GPX string to GeoJSON, returned as a JSON string.
#[wasm_bindgen(js_name = gpxToGeoJsonString)]
pub fn gpx_to_geojson_string(gpx_string: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let doc = parser::parse_gpx(gpx_string)?;
    let fc = converter::to_feature_collection(&doc, &opts);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
