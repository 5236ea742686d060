//! Hit-testing: which element, and which part of it, lies under a point.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::ElementId;
use crate::geom::{Point, Rect};
use crate::store::EditorStore;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
}

/// Anchor position for the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether dragging this handle moves the bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Center of a handle on the edge or corner of `rect`.
#[must_use]
pub fn handle_center(rect: &Rect, anchor: ResizeAnchor) -> Point {
    let cx = rect.x + rect.width * 0.5;
    let cy = rect.y + rect.height * 0.5;
    match anchor {
        ResizeAnchor::N => Point::new(cx, rect.y),
        ResizeAnchor::Ne => Point::new(rect.right(), rect.y),
        ResizeAnchor::E => Point::new(rect.right(), cy),
        ResizeAnchor::Se => Point::new(rect.right(), rect.bottom()),
        ResizeAnchor::S => Point::new(cx, rect.bottom()),
        ResizeAnchor::Sw => Point::new(rect.x, rect.bottom()),
        ResizeAnchor::W => Point::new(rect.x, cy),
        ResizeAnchor::Nw => Point::new(rect.x, rect.y),
    }
}

/// Square hit/paint area of a handle.
#[must_use]
pub fn handle_rect(rect: &Rect, anchor: ResizeAnchor) -> Rect {
    let c = handle_center(rect, anchor);
    Rect::new(
        c.x - HANDLE_RADIUS_PX,
        c.y - HANDLE_RADIUS_PX,
        HANDLE_RADIUS_PX * 2.0,
        HANDLE_RADIUS_PX * 2.0,
    )
}

/// Test which element (if any) is under `pt`, in canvas coordinates.
///
/// Handles of the selected element win over everything else; bodies are
/// tested top of the stack first.
#[must_use]
pub fn hit_test(pt: Point, store: &EditorStore) -> Option<Hit> {
    if let Some(selected) = store.selected_element() {
        let rect = selected.rect();
        for anchor in ResizeAnchor::ALL {
            if handle_rect(&rect, anchor).contains(pt) {
                return Some(Hit { element_id: selected.id.clone(), part: HitPart::ResizeHandle(anchor) });
            }
        }
    }

    store
        .elements()
        .iter()
        .rev()
        .find(|e| e.rect().contains(pt))
        .map(|e| Hit { element_id: e.id.clone(), part: HitPart::Body })
}
