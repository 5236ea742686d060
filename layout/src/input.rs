//! Input model: mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. It carries the element's rect at gesture start and the
//! in-flight rect, so the store is only touched once the gesture commits.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geom::{Point, Rect};
use crate::hit::ResizeAnchor;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key, holding the name reported by the host (e.g. `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key removes the selected element.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an element across the canvas.
    DraggingElement {
        /// Id of the element being dragged.
        id: ElementId,
        /// Canvas position of the pointer at pointer-down.
        start: Point,
        /// Element rect at pointer-down.
        orig: Rect,
        /// Where the element would land if released now.
        current: Rect,
    },
    /// The user is resizing an element by one of its eight handles.
    ResizingElement {
        /// Id of the element being resized.
        id: ElementId,
        /// Which corner/edge handle is being dragged.
        anchor: ResizeAnchor,
        /// Canvas position of the pointer at pointer-down.
        start: Point,
        /// Element rect at pointer-down.
        orig: Rect,
        /// Rect the element would get if released now.
        current: Rect,
    },
}

impl InputState {
    /// The element being manipulated and its in-flight rect, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<(&ElementId, Rect)> {
        match self {
            Self::Idle => None,
            Self::DraggingElement { id, current, .. } | Self::ResizingElement { id, current, .. } => {
                Some((id, *current))
            }
        }
    }
}
