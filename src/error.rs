use std::io;
use std::path::PathBuf;

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Coarse classification of a [`Gpx2GeoJsonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be read or is not well-formed XML. Fatal for the file.
    Parse,
    /// A waypoint lacks usable coordinates. Fatal for that waypoint only.
    MalformedWaypoint,
    /// The output could not be written. Fatal for the file.
    Io,
}

#[derive(Debug, Error)]
pub enum Gpx2GeoJsonError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Gpx2GeoJsonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } | Self::XmlParse(_) | Self::Malformed(_) => ErrorKind::Parse,
            Self::MissingAttribute { .. } | Self::InvalidAttribute { .. } => {
                ErrorKind::MalformedWaypoint
            }
            Self::Write { .. } | Self::Json(_) => ErrorKind::Io,
        }
    }
}

impl From<Gpx2GeoJsonError> for JsValue {
    fn from(e: Gpx2GeoJsonError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Recoverable problems found while converting a document.
///
/// These never abort a conversion; they are logged as they occur and the
/// waypoint-level ones are collected on the conversion result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionWarning {
    #[error("waypoint '{waypoint}' has no type and was skipped")]
    MissingType { waypoint: String },
    #[error("waypoint '{waypoint}' has no readable <{field}>")]
    MissingField {
        waypoint: String,
        field: &'static str,
    },
    #[error("waypoint '{waypoint}' was skipped: {reason}")]
    SkippedWaypoint { waypoint: String, reason: String },
}
