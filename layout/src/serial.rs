//! Layout serializer: the persisted canvas-layout document.
//!
//! DESIGN
//! ======
//! A template is stored as one JSON document:
//!
//! ```json
//! {"version":"1.0","canvas":{"width":794,"height":1123,"unit":"px","pageFormat":"A4"},"elements":[...]}
//! ```
//!
//! `elements` order is paint order. Export always writes the current
//! version and the fixed A4 canvas block.
//!
//! ERROR HANDLING
//! ==============
//! [`import`] is strict and reports why a document is unusable.
//! [`import_lenient`] keeps the editor usable on legacy or damaged
//! documents: it logs the problem, drops elements it cannot read, and
//! falls back to an empty collection when the document itself is unusable.

#[cfg(test)]
#[path = "serial_test.rs"]
mod serial_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{CANVAS_HEIGHT_PX, CANVAS_UNIT, CANVAS_WIDTH_PX, FORMAT_VERSION, PAGE_FORMAT};
use crate::doc::Element;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("malformed layout document: {0}")]
    MalformedDocument(String),
    #[error("malformed element at index {index}: {reason}")]
    MalformedElement { index: usize, reason: String },
    #[error("layout serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Page block of the layout document. Dimensions are whole pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub unit: String,
    pub page_format: String,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH_PX,
            height: CANVAS_HEIGHT_PX,
            unit: CANVAS_UNIT.to_owned(),
            page_format: PAGE_FORMAT.to_owned(),
        }
    }
}

/// The full persisted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub version: String,
    pub canvas: CanvasSpec,
    pub elements: Vec<Element>,
}

/// Wrap `elements` in a current-version document.
#[must_use]
pub fn export(elements: &[Element]) -> TemplateDocument {
    TemplateDocument {
        version: FORMAT_VERSION.to_owned(),
        canvas: CanvasSpec::default(),
        elements: elements.to_vec(),
    }
}

/// Export straight to a JSON string.
///
/// # Errors
///
/// Returns [`LayoutError::Serialize`] if serde fails, which only happens for
/// non-finite coordinates.
pub fn to_json(elements: &[Element]) -> Result<String, LayoutError> {
    Ok(serde_json::to_string(&export(elements))?)
}

/// Parse a layout document and return its elements.
///
/// # Errors
///
/// - [`LayoutError::MalformedDocument`] if the input is not JSON, not an
///   object, or has no `elements` array.
/// - [`LayoutError::MalformedElement`] for the first element that does not
///   match any element variant.
pub fn import(json: &str) -> Result<Vec<Element>, LayoutError> {
    let raw = parse_element_values(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| LayoutError::MalformedElement { index, reason: e.to_string() })
        })
        .collect()
}

/// Tolerant import: never fails.
///
/// An unusable document yields an empty collection; unreadable elements
/// are skipped. Every fallback is logged.
#[must_use]
pub fn import_lenient(json: &str) -> Vec<Element> {
    let raw = match parse_element_values(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "layout document unusable; starting with an empty canvas");
            return Vec::new();
        }
    };

    let mut elements = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<Element>(value) {
            Ok(element) => elements.push(element),
            Err(e) => warn!(index, error = %e, "skipping unreadable layout element"),
        }
    }
    elements
}

/// Shared front half of both imports: check the envelope and pull out the
/// raw element values.
fn parse_element_values(json: &str) -> Result<Vec<serde_json::Value>, LayoutError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| LayoutError::MalformedDocument(e.to_string()))?;
    let serde_json::Value::Object(mut doc) = value else {
        return Err(LayoutError::MalformedDocument("document is not a JSON object".into()));
    };

    match doc.get("version").and_then(serde_json::Value::as_str) {
        Some(FORMAT_VERSION) => {}
        Some(other) => warn!(version = other, "unrecognized layout version; reading as current"),
        None => warn!("layout document has no version; reading as current"),
    }

    match doc.remove("elements") {
        Some(serde_json::Value::Array(items)) => Ok(items),
        Some(_) => Err(LayoutError::MalformedDocument("`elements` is not an array".into())),
        None => Err(LayoutError::MalformedDocument("missing `elements`".into())),
    }
}
