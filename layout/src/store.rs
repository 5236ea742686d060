//! Editor store: the ordered element collection and the selection pointer
//! for one editing session.
//!
//! DESIGN
//! ======
//! Order in `elements` is paint order: index 0 is drawn first (bottom), the
//! last element is drawn on top. The store is single-threaded and every
//! operation is total. Lookups that miss are no-ops that report `false`
//! rather than errors.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use tracing::debug;

use crate::doc::{Element, ElementDraft, ElementId, ElementPatch};

const ID_PREFIX: &str = "elem";
const ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Latest millisecond timestamp a browser `Date` can hold. Clock readings and
/// reserved ids are capped here, leaving the rest of `u64` for increments.
pub const MAX_ID_TIMESTAMP_MS: u64 = 8_640_000_000_000_000;

/// Direction for [`EditorStore::change_element_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Move to the top of the stack (end of the collection).
    Forward,
    /// Move to the bottom of the stack (start of the collection).
    Backward,
}

/// Generates `elem-<millis>-<suffix>` ids.
///
/// The millisecond component is forced to increase strictly within a
/// session, so two ids from the same generator never share it even when
/// the clock stalls or goes backwards. Timestamps above
/// [`MAX_ID_TIMESTAMP_MS`], whether read from the clock or reserved from a
/// loaded id, count as that value.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_ms: u64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id using the wall clock.
    pub fn next_id(&mut self) -> ElementId {
        self.next_id_at(now_ms())
    }

    /// Next id as if the clock read `now_ms`.
    pub fn next_id_at(&mut self, now_ms: u64) -> ElementId {
        let ts = now_ms.min(MAX_ID_TIMESTAMP_MS).max(self.last_ms.saturating_add(1));
        self.last_ms = ts;
        ElementId::new(format!("{ID_PREFIX}-{ts}-{}", random_suffix()))
    }

    /// Make sure later ids sort after an id that came from elsewhere
    /// (e.g. a loaded template). Ids in other formats are ignored.
    pub fn reserve(&mut self, id: &ElementId) {
        if let Some(ts) = id_timestamp(id) {
            if ts > MAX_ID_TIMESTAMP_MS {
                debug!(%id, "reserved id timestamp capped");
            }
            self.last_ms = self.last_ms.max(ts.min(MAX_ID_TIMESTAMP_MS));
        }
    }
}

fn now_ms() -> u64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(dur.as_millis()).unwrap_or(u64::MAX)
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

fn id_timestamp(id: &ElementId) -> Option<u64> {
    let mut parts = id.as_str().splitn(3, '-');
    if parts.next()? != ID_PREFIX {
        return None;
    }
    let Ok(ts) = parts.next()?.parse::<u64>() else {
        return None;
    };
    Some(ts)
}

/// Sole owner of the element collection and selection for one session.
#[derive(Debug, Default)]
pub struct EditorStore {
    elements: Vec<Element>,
    selected_id: Option<ElementId>,
    ids: IdGenerator,
}

impl EditorStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new element on top of the stack and select it.
    pub fn add_element(&mut self, draft: ElementDraft) -> ElementId {
        let id = self.ids.next_id();
        debug!(%id, kind = draft.kind.type_name(), "element added");
        self.elements.push(draft.into_element(id.clone()));
        self.selected_id = Some(id.clone());
        id
    }

    /// Merge `patch` into the element with `id`. Returns `false` if there is
    /// no such element.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            return false;
        };
        element.apply_patch(patch);
        true
    }

    /// Remove an element, clearing the selection if it pointed at it.
    /// Returns `false` if there is no such element.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| &e.id != id);
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
        }
        let removed = self.elements.len() != before;
        if removed {
            debug!(%id, "element deleted");
        }
        removed
    }

    /// Point the selection at `id`, or clear it with `None`. Existence is
    /// not checked; a stale id simply selects nothing.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.selected_id = id;
    }

    /// Move an element to the top or bottom of the stack. Returns `false`
    /// if there is no such element.
    pub fn change_element_order(&mut self, id: &ElementId, order: Order) -> bool {
        let Some(index) = self.elements.iter().position(|e| &e.id == id) else {
            return false;
        };
        let element = self.elements.remove(index);
        match order {
            Order::Forward => self.elements.push(element),
            Order::Backward => self.elements.insert(0, element),
        }
        true
    }

    /// Remove every element and clear the selection.
    pub fn clear_all_elements(&mut self) {
        self.elements.clear();
        self.selected_id = None;
    }

    /// Replace the whole collection, e.g. after loading a template. The
    /// selection is cleared.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        for element in &elements {
            self.ids.reserve(&element.id);
        }
        self.elements = elements;
        self.selected_id = None;
    }

    /// The element the selection points at, if it still exists.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected_id.as_ref()?;
        self.element(id)
    }

    /// The raw selection pointer, which may be stale.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected_id.as_ref()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// All elements in paint order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
