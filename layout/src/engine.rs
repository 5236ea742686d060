use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{Element, ElementDraft, ElementId, ElementPatch};
use crate::geom::{Point, Rect, Viewport};
use crate::hit::{HitPart, ResizeAnchor, hit_test};
use crate::input::{Button, InputState, Key};
use crate::render::{RenderMode, Scene, render};
use crate::store::{EditorStore, Order};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Selected(ElementId),
    SelectionCleared,
    ElementUpdated { id: ElementId, patch: ElementPatch },
    ElementDeleted { id: ElementId },
    SetCursor(String),
    RenderNeeded,
}

/// Editor engine: the store plus the drag/resize gesture machine.
///
/// Pointer handlers take screen coordinates and convert them through
/// `viewport`. During a gesture only the in-flight rect in `input` moves;
/// the store is updated once, on pointer-up. A drag commits `position`; a
/// resize commits `position` and `size`.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub store: EditorStore,
    pub input: InputState,
    pub viewport: Viewport,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Store operations ---

    /// Toolbar: place a new element on top and select it.
    pub fn add_element(&mut self, draft: ElementDraft) -> ElementId {
        self.store.add_element(draft)
    }

    /// Inspector: merge a sparse edit into an element.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        self.store.update_element(id, patch)
    }

    /// Remove an element, abandoning any gesture on it.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        if self.input.in_flight().is_some_and(|(flying, _)| flying == id) {
            self.input = InputState::Idle;
        }
        self.store.delete_element(id)
    }

    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.store.select_element(id);
    }

    pub fn change_element_order(&mut self, id: &ElementId, order: Order) -> bool {
        self.store.change_element_order(id, order)
    }

    /// Reset the canvas.
    pub fn clear_all_elements(&mut self) {
        self.input = InputState::Idle;
        self.store.clear_all_elements();
    }

    /// Replace the whole collection with a loaded template.
    pub fn load_elements(&mut self, elements: Vec<Element>) {
        self.input = InputState::Idle;
        self.store.replace_elements(elements);
    }

    // --- Queries ---

    /// The currently selected element, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.store.selected_element()
    }

    /// All elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    /// Preview scene, with any in-flight gesture drawn at its current rect.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let selected = self.store.selected_id();
        let Some((flying, rect)) = self.input.in_flight() else {
            return render(self.store.elements(), selected, RenderMode::Preview);
        };

        let elements: Vec<Element> = self
            .store
            .elements()
            .iter()
            .map(|e| {
                let mut e = e.clone();
                if &e.id == flying {
                    e.apply_patch(&ElementPatch::rect(rect));
                }
                e
            })
            .collect();
        render(&elements, selected, RenderMode::Preview)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let pt = self.viewport.screen_to_canvas(screen_pt);
        let mut actions = Vec::new();

        match hit_test(pt, &self.store) {
            Some(hit) => {
                let Some(rect) = self.store.element(&hit.element_id).map(Element::rect) else {
                    return actions;
                };
                match hit.part {
                    HitPart::ResizeHandle(anchor) => {
                        actions.push(Action::SetCursor(anchor.cursor().to_owned()));
                        self.input =
                            InputState::ResizingElement { id: hit.element_id, anchor, start: pt, orig: rect, current: rect };
                    }
                    HitPart::Body => {
                        if self.store.selected_id() != Some(&hit.element_id) {
                            self.store.select_element(Some(hit.element_id.clone()));
                            actions.push(Action::Selected(hit.element_id.clone()));
                            actions.push(Action::RenderNeeded);
                        }
                        actions.push(Action::SetCursor("move".to_owned()));
                        self.input = InputState::DraggingElement { id: hit.element_id, start: pt, orig: rect, current: rect };
                    }
                }
            }
            None => {
                // Background click.
                if self.store.selected_id().is_some() {
                    self.store.select_element(None);
                    actions.push(Action::SelectionCleared);
                    actions.push(Action::RenderNeeded);
                }
                self.input = InputState::Idle;
            }
        }

        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport.screen_to_canvas(screen_pt);
        let bounds = Rect::canvas();

        let changed = match &mut self.input {
            InputState::Idle => false,
            InputState::DraggingElement { start, orig, current, .. } => {
                // Back at the press point: leave even an out-of-bounds rect alone.
                let next = if pt == *start {
                    *orig
                } else {
                    Rect::new(orig.x + pt.x - start.x, orig.y + pt.y - start.y, orig.width, orig.height)
                        .clamp_within(&bounds)
                };
                let changed = next != *current;
                *current = next;
                changed
            }
            InputState::ResizingElement { anchor, start, orig, current, .. } => {
                let next = resize_rect(orig, *anchor, pt.x - start.x, pt.y - start.y, &bounds);
                let changed = next != *current;
                *current = next;
                changed
            }
        };

        if changed { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        // Apply the final pointer position before committing.
        let mut actions = self.on_pointer_move(screen_pt);

        let patch = match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::DraggingElement { id, orig, current, .. } => {
                (current != orig).then(|| (id, ElementPatch::position(current.x, current.y)))
            }
            InputState::ResizingElement { id, orig, current, .. } => {
                (current != orig).then(|| (id, ElementPatch::rect(current)))
            }
        };

        if let Some((id, patch)) = patch {
            if self.store.update_element(&id, &patch) {
                actions.push(Action::ElementUpdated { id, patch });
                actions.push(Action::RenderNeeded);
            }
        }
        actions.push(Action::SetCursor("default".to_owned()));
        actions
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_escape() {
            let had_gesture = !matches!(self.input, InputState::Idle);
            self.input = InputState::Idle;
            if self.store.selected_id().is_some() {
                self.store.select_element(None);
                return vec![Action::SelectionCleared, Action::RenderNeeded];
            }
            return if had_gesture { vec![Action::RenderNeeded] } else { Vec::new() };
        }

        if key.is_delete() {
            let Some(id) = self.store.selected_element().map(|e| e.id.clone()) else {
                return Vec::new();
            };
            self.delete_element(&id);
            return vec![Action::ElementDeleted { id }, Action::RenderNeeded];
        }

        Vec::new()
    }
}

/// New rect after dragging `anchor` by (`dx`, `dy`) from `orig`.
///
/// Edges not controlled by the anchor stay put. Moving edges are clamped to
/// `bounds` and cannot cross the opposite edge closer than
/// `MIN_ELEMENT_SIZE`. An axis with zero delta is left exactly as it was, so
/// an element already smaller than the minimum or past the bounds is not
/// altered by a click on its handle.
#[must_use]
pub fn resize_rect(orig: &Rect, anchor: ResizeAnchor, dx: f64, dy: f64, bounds: &Rect) -> Rect {
    let mut next = *orig;

    if dx.abs() > 0.0 && (anchor.moves_left() || anchor.moves_right()) {
        let mut left = orig.x;
        let mut right = orig.right();
        if anchor.moves_left() {
            left = (left + dx).max(bounds.x).min(right - MIN_ELEMENT_SIZE);
        }
        if anchor.moves_right() {
            right = (right + dx).min(bounds.right()).max(left + MIN_ELEMENT_SIZE);
        }
        next.x = left;
        next.width = right - left;
    }
    if dy.abs() > 0.0 && (anchor.moves_top() || anchor.moves_bottom()) {
        let mut top = orig.y;
        let mut bottom = orig.bottom();
        if anchor.moves_top() {
            top = (top + dy).max(bounds.y).min(bottom - MIN_ELEMENT_SIZE);
        }
        if anchor.moves_bottom() {
            bottom = (bottom + dy).min(bounds.bottom()).max(top + MIN_ELEMENT_SIZE);
        }
        next.y = top;
        next.height = bottom - top;
    }

    next
}
