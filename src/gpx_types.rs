/// Namespace of GPX 1.1 documents. Element lookups only match this namespace
/// (or elements with no namespace at all).
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Label used in diagnostics for waypoints without a readable `<name>`.
pub const UNNAMED_WAYPOINT: &str = "<unnamed waypoint>";

/// A parsed GPX document.
#[derive(Debug, Clone, PartialEq)]
pub struct GpxDocument {
    pub root: GpxElement,
}

/// One XML element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxElement {
    /// Resolved namespace URI, `None` when the element is unqualified.
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated direct text content, `None` if the element has none.
    pub text: Option<String>,
    pub children: Vec<GpxElement>,
}

impl GpxElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether this element is the GPX element `tag`.
    pub fn is_gpx(&self, tag: &str) -> bool {
        self.name == tag && matches!(self.namespace.as_deref(), None | Some(GPX_NAMESPACE))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child that is the GPX element `tag`.
    pub fn find(&self, tag: &str) -> Option<&GpxElement> {
        self.children.iter().find(|child| child.is_gpx(tag))
    }

    /// All direct children that are the GPX element `tag`, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a GpxElement> + 'a {
        self.children.iter().filter(move |child| child.is_gpx(tag))
    }

    /// Trimmed text of the child `tag`.
    ///
    /// Returns `None` when the child is absent or its text is empty or
    /// whitespace-only (pretty-printers leave a lone newline in such nodes).
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.find(tag)
            .and_then(|child| child.text.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub(crate) fn push_text(&mut self, fragment: &str) {
        self.text.get_or_insert_with(String::new).push_str(fragment);
    }
}
