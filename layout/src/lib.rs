//! Layout engine for invoice templates.
//!
//! A template is an ordered list of positioned elements (static text,
//! images, and dynamic fields that are filled with invoice data) on a fixed
//! A4 canvas. This crate owns the element model, the editing store, the
//! drag/resize gesture machine, the persisted JSON format, and the display
//! list a host draws from. It does no drawing itself: hosts feed pointer and
//! key events to [`engine::EditorCore`] and paint the resulting
//! [`render::Scene`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Element types, styles, drafts and patches |
//! | [`store`] | Ordered element collection, selection, id generation |
//! | [`engine`] | Store plus gesture handling; testable [`engine::EditorCore`] |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing bodies and resize handles |
//! | [`geom`] | Points, rects, and the screen-to-canvas viewport |
//! | [`render`] | Display-list rendering for preview and final output |
//! | [`field`] | Dynamic field names and display text assembly |
//! | [`serial`] | Versioned layout document import/export |
//! | [`page`] | Load/edit/save lifecycle of one template |
//! | [`storage`] | Template storage trait, HTTP and in-memory backends |
//! | [`upload`] | Image bytes to `data:` URI |
//! | [`consts`] | Canvas size, style defaults, size limits |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod field;
pub mod geom;
pub mod hit;
pub mod input;
pub mod page;
pub mod render;
pub mod serial;
pub mod storage;
pub mod store;
pub mod upload;
