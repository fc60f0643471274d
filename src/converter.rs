use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::error::{ConversionWarning, Gpx2GeoJsonError};
use crate::gpx_types::*;
use crate::options::{ConvertOptions, DEFAULT_MARKER_COLOR};
use crate::parser::extract_waypoints;

type Result<T> = std::result::Result<T, Gpx2GeoJsonError>;

/// Marker size written on every feature.
pub const MARKER_SIZE: &str = "small";

/// GPX child element and the feature property it is copied into.
const TEXT_FIELDS: [(&str, &str); 4] = [
    ("name", "name"),
    ("sym", "marker-type"),
    ("type", "category"),
    ("desc", "description"),
];

/// Properties of one marker feature. `Default` gives the unset template.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerProperties {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub marker_color: String,
    pub marker_size: String,
    pub marker_type: Option<String>,
    pub marker_symbol: String,
}

impl Default for MarkerProperties {
    fn default() -> Self {
        Self {
            name: None,
            category: None,
            description: None,
            marker_color: DEFAULT_MARKER_COLOR.to_string(),
            marker_size: MARKER_SIZE.to_string(),
            marker_type: None,
            marker_symbol: String::new(),
        }
    }
}

impl MarkerProperties {
    fn set_text(&mut self, property: &str, text: &str) {
        let slot = match property {
            "name" => &mut self.name,
            "marker-type" => &mut self.marker_type,
            "category" => &mut self.category,
            "description" => &mut self.description,
            _ => return,
        };
        *slot = Some(text.to_string());
    }

    fn into_json(self) -> Map<String, JsonValue> {
        let mut props = Map::new();
        insert_optional(&mut props, "name", self.name);
        insert_optional(&mut props, "category", self.category);
        insert_optional(&mut props, "description", self.description);
        props.insert("marker-color".to_string(), JsonValue::String(self.marker_color));
        props.insert("marker-size".to_string(), JsonValue::String(self.marker_size));
        insert_optional(&mut props, "marker-type", self.marker_type);
        props.insert("marker-symbol".to_string(), JsonValue::String(self.marker_symbol));
        props
    }
}

/// Waypoints that carry a type, and the distinct types in first-seen order.
#[derive(Debug, Default)]
pub struct Classification<'a> {
    pub types: Vec<String>,
    pub waypoints: Vec<&'a GpxElement>,
    pub skipped: Vec<ConversionWarning>,
}

/// Features of one waypoint type, with the color they were given.
#[derive(Debug, Clone)]
pub struct TypeGroup {
    pub waypoint_type: String,
    pub marker_color: String,
    pub features: Vec<Feature>,
}

/// Result of converting one document.
#[derive(Debug)]
pub struct Conversion {
    pub collection: FeatureCollection,
    /// Distinct waypoint types in first-seen order, excluded type included.
    pub types: Vec<String>,
    /// Waypoints left out of the output because of missing data.
    pub warnings: Vec<ConversionWarning>,
}

/// Convert a parsed GPX document to a GeoJSON FeatureCollection.
pub fn to_feature_collection(doc: &GpxDocument, opts: &ConvertOptions) -> FeatureCollection {
    convert_document(doc, opts).collection
}

/// Run the whole waypoint pipeline over `doc`.
pub fn convert_document(doc: &GpxDocument, opts: &ConvertOptions) -> Conversion {
    let waypoints = extract_waypoints(doc);
    let classification = classify_waypoints(&waypoints);
    let mut warnings = classification.skipped.clone();
    let groups = group_by_type(&classification, opts, &mut warnings);
    let collection = assemble_collection(groups, &opts.excluded_type);

    debug!(
        waypoints = waypoints.len(),
        features = collection.features.len(),
        skipped = warnings.len(),
        "converted document"
    );

    Conversion {
        collection,
        types: classification.types,
        warnings,
    }
}

/// Collect the distinct waypoint types and drop waypoints without one.
pub fn classify_waypoints<'a>(waypoints: &[&'a GpxElement]) -> Classification<'a> {
    let mut classification = Classification::default();

    for &wpt in waypoints {
        match wpt.child_text("type") {
            Some(wpt_type) => {
                if !classification.types.iter().any(|t| t == wpt_type) {
                    classification.types.push(wpt_type.to_string());
                }
                classification.waypoints.push(wpt);
            }
            None => {
                let warning = ConversionWarning::MissingType {
                    waypoint: waypoint_label(wpt).to_string(),
                };
                warn!("{warning}");
                classification.skipped.push(warning);
            }
        }
    }

    classification
}

/// Whether `wpt` has the type `target`. Waypoints without a type never match.
pub fn waypoint_matches(wpt: &GpxElement, target: &str) -> bool {
    wpt.child_text("type") == Some(target)
}

/// Build a marker feature from a `<wpt>` element.
///
/// `marker_color` and `marker_symbol` replace the defaults when given,
/// regardless of which text fields the waypoint has.
pub fn waypoint_to_feature(
    wpt: &GpxElement,
    marker_color: Option<&str>,
    marker_symbol: Option<&str>,
) -> Result<Feature> {
    let lon = parse_coordinate(wpt, "lon")?;
    let lat = parse_coordinate(wpt, "lat")?;

    let mut props = MarkerProperties::default();
    for (field, property) in TEXT_FIELDS {
        match wpt.child_text(field) {
            Some(text) => props.set_text(property, text),
            None => {
                let warning = ConversionWarning::MissingField {
                    waypoint: waypoint_label(wpt).to_string(),
                    field,
                };
                warn!("{warning}");
            }
        }
    }

    if let Some(color) = marker_color {
        props.marker_color = color.to_string();
    }
    if let Some(symbol) = marker_symbol {
        props.marker_symbol = symbol.to_string();
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(props.into_json()),
        foreign_members: None,
    })
}

/// Build the features of every classified type except the excluded one,
/// colored by type position.
///
/// Waypoints with unusable coordinates are left out and recorded in
/// `warnings`.
pub fn group_by_type(
    classification: &Classification<'_>,
    opts: &ConvertOptions,
    warnings: &mut Vec<ConversionWarning>,
) -> Vec<TypeGroup> {
    let mut groups = Vec::with_capacity(classification.types.len());

    for (index, wpt_type) in classification.types.iter().enumerate() {
        // The excluded type keeps its palette slot but builds no features.
        if opts.is_excluded(wpt_type) {
            debug!(waypoint_type = %wpt_type, "skipping excluded type");
            continue;
        }
        let color = opts.marker_color(index);
        let symbol = opts.marker_symbol(wpt_type);
        info!(waypoint_type = %wpt_type, color, "assigned marker color");

        let mut features = Vec::new();
        for &wpt in &classification.waypoints {
            if !waypoint_matches(wpt, wpt_type) {
                continue;
            }
            match waypoint_to_feature(wpt, Some(color), symbol) {
                Ok(feature) => features.push(feature),
                Err(e) => {
                    let warning = ConversionWarning::SkippedWaypoint {
                        waypoint: waypoint_label(wpt).to_string(),
                        reason: e.to_string(),
                    };
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        groups.push(TypeGroup {
            waypoint_type: wpt_type.clone(),
            marker_color: color.to_string(),
            features,
        });
    }

    groups
}

/// Flatten type groups into one collection, leaving out `excluded_type`.
pub fn assemble_collection(groups: Vec<TypeGroup>, excluded_type: &str) -> FeatureCollection {
    let features = groups
        .into_iter()
        .filter(|group| group.waypoint_type != excluded_type)
        .flat_map(|group| group.features)
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Name of a waypoint for diagnostics; never fails.
fn waypoint_label(wpt: &GpxElement) -> &str {
    wpt.child_text("name").unwrap_or(UNNAMED_WAYPOINT)
}

fn parse_coordinate(wpt: &GpxElement, attribute: &'static str) -> Result<f64> {
    let raw = wpt
        .attribute(attribute)
        .ok_or(Gpx2GeoJsonError::MissingAttribute {
            element: "wpt",
            attribute,
        })?;

    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Gpx2GeoJsonError::InvalidAttribute {
            element: "wpt",
            attribute,
            value: raw.to_string(),
        })
}

fn insert_optional(props: &mut Map<String, JsonValue>, key: &str, value: Option<String>) {
    let value = match value {
        Some(v) => JsonValue::String(v),
        None => JsonValue::Null,
    };
    props.insert(key.to_string(), value);
}
