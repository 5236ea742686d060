//! Rendering: turns the element collection into a display list.
//!
//! This module receives read-only views of the elements and produces a
//! backend-neutral [`Scene`]: paint items in back-to-front order plus the
//! selection overlay. Hosts (the editor surface, the PDF generator) walk the
//! scene and draw it; nothing here mutates application state.
//!
//! Style defaults are applied here and only here.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, IMAGE_PLACEHOLDER, TEXT_PLACEHOLDER};
use crate::doc::{Element, ElementId, ElementKind, ResolvedStyle};
use crate::field::{FieldSource, SampleData, resolve_field_text};
use crate::geom::Rect;
use crate::hit::{ResizeAnchor, handle_rect};

/// Where field values come from.
#[derive(Clone, Copy)]
pub enum RenderMode<'a> {
    /// Editor preview: sample values, placeholder markers, selection overlay.
    Preview,
    /// Final document: real values, no editor chrome.
    Final(&'a dyn FieldSource),
}

/// How an image is fitted into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Scale to fit inside the box, preserving aspect ratio, centered.
    Contain,
}

/// Visual marker distinguishing a dynamic field in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMarker {
    Dashed,
}

/// What to paint inside an element's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "paint", rename_all = "snake_case")]
pub enum Paint {
    Text {
        text: String,
        style: ResolvedStyle,
        wrap: bool,
        preserve_whitespace: bool,
        /// True when `text` is the empty-content placeholder.
        placeholder: bool,
    },
    Image {
        url: String,
        fit: Fit,
    },
    ImagePlaceholder {
        label: String,
    },
    Field {
        text: String,
        style: ResolvedStyle,
        marker: FieldMarker,
    },
}

/// One element's contribution to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintItem {
    pub element_id: ElementId,
    pub rect: Rect,
    pub paint: Paint,
}

/// Outline and handles around the selected element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOverlay {
    pub element_id: ElementId,
    pub outline: Rect,
    pub handles: Vec<(ResizeAnchor, Rect)>,
}

/// A fully resolved frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Bottom first.
    pub items: Vec<PaintItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionOverlay>,
}

/// Build the scene for `elements` in paint order.
///
/// `selected` only matters in [`RenderMode::Preview`]; a stale id produces
/// no overlay.
#[must_use]
pub fn render(elements: &[Element], selected: Option<&ElementId>, mode: RenderMode<'_>) -> Scene {
    let items = elements.iter().map(|e| render_element(e, mode)).collect();

    let selection = match mode {
        RenderMode::Preview => selected
            .and_then(|id| elements.iter().find(|e| &e.id == id))
            .map(selection_overlay),
        RenderMode::Final(_) => None,
    };

    Scene { width: CANVAS_WIDTH, height: CANVAS_HEIGHT, items, selection }
}

/// Paint a single element.
#[must_use]
pub fn render_element(element: &Element, mode: RenderMode<'_>) -> PaintItem {
    let style = element.style.clone().unwrap_or_default().resolve();

    let paint = match &element.kind {
        ElementKind::Text { content } => {
            let placeholder = content.is_empty();
            Paint::Text {
                text: if placeholder { TEXT_PLACEHOLDER.to_owned() } else { content.clone() },
                style,
                wrap: true,
                preserve_whitespace: true,
                placeholder,
            }
        }
        ElementKind::Image { url } => match url.as_deref() {
            Some(url) if !url.is_empty() => Paint::Image { url: url.to_owned(), fit: Fit::Contain },
            _ => Paint::ImagePlaceholder { label: IMAGE_PLACEHOLDER.to_owned() },
        },
        ElementKind::Field { field_name, prefix, suffix, .. } => match mode {
            RenderMode::Preview => Paint::Field {
                text: resolve_field_text(&SampleData, *field_name, prefix.as_deref(), suffix.as_deref()),
                style,
                marker: FieldMarker::Dashed,
            },
            RenderMode::Final(source) => Paint::Text {
                text: resolve_field_text(source, *field_name, prefix.as_deref(), suffix.as_deref()),
                style,
                wrap: true,
                preserve_whitespace: true,
                placeholder: false,
            },
        },
    };

    PaintItem { element_id: element.id.clone(), rect: element.rect(), paint }
}

fn selection_overlay(element: &Element) -> SelectionOverlay {
    let outline = element.rect();
    SelectionOverlay {
        element_id: element.id.clone(),
        outline,
        handles: ResizeAnchor::ALL
            .into_iter()
            .map(|anchor| (anchor, handle_rect(&outline, anchor)))
            .collect(),
    }
}

/// Destination rect for an image with the given intrinsic size painted with
/// [`Fit::Contain`] inside `item_rect`.
#[must_use]
pub fn image_dest_rect(item_rect: &Rect, intrinsic_width: f64, intrinsic_height: f64) -> Rect {
    item_rect.contain(intrinsic_width, intrinsic_height)
}
