//! Document model: template elements, their properties, and sparse edits.
//!
//! This module defines what can be placed on the template canvas
//! (`Element`, `ElementKind`), the caller-supplied shape of a new element
//! (`ElementDraft`), and a sparse-update type for incremental edits
//! (`ElementPatch`). Serialization follows the persisted layout format: each
//! element is a flat JSON object discriminated by its `"type"` key.
//!
//! Style defaults are a rendering concern. A stored `Style` keeps unset
//! fields as `None`; [`Style::resolve`] fills them in when painting.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::field::FieldName;
use crate::geom::Rect;

/// Unique identifier for a placed element, e.g. `elem-1706700000000-k3j9x0a2b`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-left corner in canvas px.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Box dimensions in canvas px. Both values are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text styling as stored. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Hex color, e.g. `"#1a2b3c"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

/// Style with every default applied, ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub color: String,
    pub align: TextAlign,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Style::default().resolve()
    }
}

impl Style {
    /// Merge the present fields of `patch` into `self`, keeping the rest.
    pub fn merge(&mut self, patch: &Style) {
        if let Some(size) = patch.font_size {
            self.font_size = Some(size);
        }
        if let Some(weight) = patch.font_weight {
            self.font_weight = Some(weight);
        }
        if let Some(ref color) = patch.color {
            self.color = Some(color.clone());
        }
        if let Some(align) = patch.align {
            self.align = Some(align);
        }
    }

    /// Apply defaults (14, normal, `#000000`, left). Font sizes outside
    /// 8..=72 are clamped into range.
    #[must_use]
    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            font_size: self
                .font_size
                .unwrap_or(DEFAULT_FONT_SIZE)
                .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            font_weight: self.font_weight.unwrap_or_default(),
            color: self.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            align: self.align.unwrap_or_default(),
        }
    }
}

/// Variant-specific payload of an element, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Static text.
    Text {
        #[serde(default)]
        content: String,
    },
    /// Image by remote URL or embedded data URI.
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Placeholder replaced with invoice data at generation time.
    Field {
        #[serde(rename = "fieldName")]
        field_name: FieldName,
        #[serde(default)]
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suffix: Option<String>,
    },
}

impl ElementKind {
    /// Empty text element payload.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    /// Image payload with an optional url.
    #[must_use]
    pub fn image(url: Option<String>) -> Self {
        Self::Image { url }
    }

    /// Field payload captioned with the field's default label.
    #[must_use]
    pub fn field(field_name: FieldName) -> Self {
        Self::Field { field_name, label: field_name.label().to_owned(), prefix: None, suffix: None }
    }

    /// The `"type"` tag.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Field { .. } => "field",
        }
    }
}

/// A placed element as stored in the editor and in the layout document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub position: Position,
    pub size: Size,
    /// Only meaningful for text and field elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Bounding box on the canvas.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.width, self.size.height)
    }

    /// Stored style, or an empty one.
    #[must_use]
    pub fn style_or_default(&self) -> Style {
        self.style.clone().unwrap_or_default()
    }

    /// Apply a sparse patch. Top-level fields are replaced; `style` is merged
    /// key by key. Variant fields that do not belong to this element's kind
    /// are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(ref style) = patch.style {
            self.style.get_or_insert_with(Style::default).merge(style);
        }

        match &mut self.kind {
            ElementKind::Text { content } => {
                if let Some(ref new_content) = patch.content {
                    content.clone_from(new_content);
                }
            }
            ElementKind::Image { url } => {
                if let Some(ref new_url) = patch.url {
                    *url = Some(new_url.clone());
                }
            }
            ElementKind::Field { field_name, label, prefix, suffix } => {
                if let Some(name) = patch.field_name {
                    *field_name = name;
                }
                if let Some(ref new_label) = patch.label {
                    label.clone_from(new_label);
                }
                if let Some(ref new_prefix) = patch.prefix {
                    *prefix = Some(new_prefix.clone());
                }
                if let Some(ref new_suffix) = patch.suffix {
                    *suffix = Some(new_suffix.clone());
                }
            }
        }
    }
}

/// Everything needed to place a new element except its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub position: Position,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl ElementDraft {
    /// Draft at (`x`, `y`) with the given size and no style.
    #[must_use]
    pub fn new(kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { position: Position { x, y }, size: Size { width, height }, style: None, kind }
    }

    /// Builder-style style setter.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// The default draft a toolbar button drops near the top-left of the
    /// page: text gets a style, fields get their default caption.
    #[must_use]
    pub fn toolbar_default(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text { .. } => Self::new(kind, 50.0, 50.0, 200.0, 40.0).with_style(Style::default()),
            ElementKind::Image { .. } => Self::new(kind, 50.0, 50.0, 150.0, 150.0),
            ElementKind::Field { .. } => Self::new(kind, 50.0, 50.0, 200.0, 30.0).with_style(Style::default()),
        }
    }

    pub(crate) fn into_element(self, id: ElementId) -> Element {
        Element { id, position: self.position, size: self.size, style: self.style, kind: self.kind }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Present style keys are merged into the existing style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<FieldName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { position: Some(Position { x, y }), ..Default::default() }
    }

    /// Patch that moves and resizes an element.
    #[must_use]
    pub fn rect(rect: Rect) -> Self {
        Self {
            position: Some(Position { x: rect.x, y: rect.y }),
            size: Some(Size { width: rect.width, height: rect.height }),
            ..Default::default()
        }
    }

    /// Patch that merges the given style keys.
    #[must_use]
    pub fn style(style: Style) -> Self {
        Self { style: Some(style), ..Default::default() }
    }
}
