use std::path::Path;

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use tracing::debug;

use crate::error::Gpx2GeoJsonError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, Gpx2GeoJsonError>;

/// Read and parse the GPX file at `path`.
///
/// The whole file is read into memory and the handle is closed before
/// parsing starts.
pub fn load_gpx(path: &Path) -> Result<GpxDocument> {
    let xml = std::fs::read_to_string(path).map_err(|source| Gpx2GeoJsonError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = xml.len(), "loaded GPX file");
    parse_gpx(&xml)
}

/// Parse a GPX XML string into an element tree.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);
    let mut open: Vec<GpxElement> = Vec::new();
    let mut root: Option<GpxElement> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => open.push(open_element(ns, &e)?),
            Ok((ns, Event::Empty(e))) => {
                let element = open_element(ns, &e)?;
                close_element(element, &mut open, &mut root)?;
            }
            Ok((_, Event::End(_))) => {
                // quick-xml rejects mismatched end tags, so the top of the
                // stack is the element being closed.
                let element = open.pop().ok_or_else(|| {
                    Gpx2GeoJsonError::Malformed("unexpected closing tag".to_string())
                })?;
                close_element(element, &mut open, &mut root)?;
            }
            Ok((_, Event::Text(e))) => {
                append_text(&mut open, std::str::from_utf8(e.as_ref()).unwrap_or_default())?;
            }
            Ok((_, Event::CData(e))) => {
                append_text(&mut open, std::str::from_utf8(e.as_ref()).unwrap_or_default())?;
            }
            Ok((_, Event::GeneralRef(e))) => {
                // Character references (&#60; &#x3C;) and predefined entities
                let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                let ch = match e.resolve_char_ref() {
                    Ok(Some(ch)) => ch,
                    _ => predefined_entity(name).ok_or_else(|| {
                        Gpx2GeoJsonError::Malformed(format!("undefined entity '&{name};'"))
                    })?,
                };
                append_text(&mut open, ch.encode_utf8(&mut [0; 4]))?;
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(Gpx2GeoJsonError::XmlParse(e)),
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Gpx2GeoJsonError::Malformed(format!(
            "element <{}> is never closed",
            unclosed.name
        )));
    }

    let root = root
        .ok_or_else(|| Gpx2GeoJsonError::Malformed("document has no root element".to_string()))?;
    Ok(GpxDocument { root })
}

/// All `<wpt>` elements directly under the document root, in document order.
pub fn extract_waypoints(doc: &GpxDocument) -> Vec<&GpxElement> {
    doc.root.find_all("wpt").collect()
}

/// Build an element (without children) from a start or empty tag.
fn open_element(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<GpxElement> {
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(Gpx2GeoJsonError::Malformed(format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let mut element = GpxElement::new(String::from_utf8_lossy(start.local_name().as_ref()));
    element.namespace = namespace;

    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| Gpx2GeoJsonError::XmlParse(e.into()))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Attach a finished element to its parent, or make it the document root.
fn close_element(
    element: GpxElement,
    open: &mut [GpxElement],
    root: &mut Option<GpxElement>,
) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(Gpx2GeoJsonError::Malformed(format!(
                "unexpected second root element <{}>",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

/// Add character data to the innermost open element. Only whitespace may
/// appear outside the root element.
fn append_text(open: &mut [GpxElement], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(current) => current.push_text(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(Gpx2GeoJsonError::Malformed(format!(
                "text outside the root element: '{}'",
                text.trim()
            )));
        }
    }
    Ok(())
}

fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
