use std::collections::HashMap;

use serde::Deserialize;

/// Marker color used when a type has no palette entry.
pub const DEFAULT_MARKER_COLOR: &str = "#f7f7f7";

/// Palette assigned to waypoint types in first-seen order.
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#d53e4f", "#fc8d59", "#fee08b", "#ffffbf", "#e6f598", "#99d594", "#3288bd",
];

/// Waypoint type left out of the output by default.
pub const DEFAULT_EXCLUDED_TYPE: &str = "Mileage";

/// Options for GPX to GeoJSON conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Marker colors, assigned to waypoint types in first-seen order.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Waypoints of this type are dropped from the output (default: "Mileage")
    #[serde(default = "default_excluded_type")]
    pub excluded_type: String,

    /// What types beyond the end of the palette get (default: fallback color)
    #[serde(default)]
    pub palette_overflow: PaletteOverflow,

    /// `marker-symbol` per waypoint type (default: none)
    #[serde(default)]
    pub marker_symbols: HashMap<String, String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            excluded_type: default_excluded_type(),
            palette_overflow: PaletteOverflow::default(),
            marker_symbols: HashMap::new(),
        }
    }
}

impl ConvertOptions {
    /// Color for the type at position `index` of the classified type list.
    pub fn marker_color(&self, index: usize) -> &str {
        match self.palette.get(index) {
            Some(color) => color,
            None => match self.palette_overflow {
                PaletteOverflow::Cycle if !self.palette.is_empty() => {
                    &self.palette[index % self.palette.len()]
                }
                _ => DEFAULT_MARKER_COLOR,
            },
        }
    }

    pub fn marker_symbol(&self, waypoint_type: &str) -> Option<&str> {
        self.marker_symbols.get(waypoint_type).map(String::as_str)
    }

    pub fn is_excluded(&self, waypoint_type: &str) -> bool {
        self.excluded_type == waypoint_type
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteOverflow {
    /// Types past the end of the palette get [`DEFAULT_MARKER_COLOR`].
    #[default]
    Fallback,
    /// Types past the end of the palette reuse it from the start.
    Cycle,
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

fn default_excluded_type() -> String {
    DEFAULT_EXCLUDED_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.palette.len(), 7);
        assert_eq!(opts.marker_color(0), "#d53e4f");
        assert_eq!(opts.marker_color(6), "#3288bd");
        assert!(opts.is_excluded("Mileage"));
        assert!(!opts.is_excluded("Camp"));
    }

    #[test]
    fn test_overflow_fallback() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.marker_color(7), DEFAULT_MARKER_COLOR);
        assert_eq!(opts.marker_color(100), DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn test_overflow_cycle() {
        let opts = ConvertOptions {
            palette_overflow: PaletteOverflow::Cycle,
            ..Default::default()
        };
        assert_eq!(opts.marker_color(7), "#d53e4f");
        assert_eq!(opts.marker_color(8), "#fc8d59");
    }

    #[test]
    fn test_empty_palette_cycle_uses_fallback() {
        let opts = ConvertOptions {
            palette: Vec::new(),
            palette_overflow: PaletteOverflow::Cycle,
            ..Default::default()
        };
        assert_eq!(opts.marker_color(0), DEFAULT_MARKER_COLOR);
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: ConvertOptions =
            serde_json::from_str(r##"{"excludedType": "Camp", "paletteOverflow": "cycle"}"##)
                .unwrap();
        assert_eq!(opts.excluded_type, "Camp");
        assert_eq!(opts.palette_overflow, PaletteOverflow::Cycle);
        assert_eq!(opts.palette, default_palette());
    }

    #[test]
    fn test_deserialize_full() {
        let opts: ConvertOptions = serde_json::from_str(
            r##"{
                "palette": ["#000000", "#ffffff"],
                "excludedType": "Gauge",
                "markerSymbols": {"Camp": "campsite"}
            }"##,
        )
        .unwrap();
        assert_eq!(opts.marker_color(1), "#ffffff");
        assert_eq!(opts.marker_color(2), DEFAULT_MARKER_COLOR);
        assert_eq!(opts.marker_symbol("Camp"), Some("campsite"));
        assert_eq!(opts.marker_symbol("Rapid"), None);
    }
}
