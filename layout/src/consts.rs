//! Shared constants for the layout crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Canvas width in whole px (A4 at 96 dpi), as written to the layout document.
pub const CANVAS_WIDTH_PX: u32 = 794;

/// Canvas height in whole px (A4 at 96 dpi), as written to the layout document.
pub const CANVAS_HEIGHT_PX: u32 = 1123;

/// [`CANVAS_WIDTH_PX`] in geometry units.
pub const CANVAS_WIDTH: f64 = 794.0;

/// [`CANVAS_HEIGHT_PX`] in geometry units.
pub const CANVAS_HEIGHT: f64 = 1123.0;

/// Unit recorded in the serialized canvas block.
pub const CANVAS_UNIT: &str = "px";

/// Page format recorded in the serialized canvas block.
pub const PAGE_FORMAT: &str = "A4";

/// Layout document version emitted on every export.
pub const FORMAT_VERSION: &str = "1.0";

// ── Style defaults ──────────────────────────────────────────────

pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;
pub const DEFAULT_COLOR: &str = "#000000";

/// Painted in place of empty text content.
pub const TEXT_PLACEHOLDER: &str = "Enter text";

/// Painted in place of an image element with no url.
pub const IMAGE_PLACEHOLDER: &str = "No image set";

// ── Interaction ─────────────────────────────────────────────────

/// Half the side length of a square resize handle, in canvas px.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Smallest width or height an element can be resized to.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

// ── Uploads ─────────────────────────────────────────────────────

/// Largest image accepted for embedding as a data URI.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
