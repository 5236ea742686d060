#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::doc::{ElementDraft, ElementKind, ElementPatch, Style, TextAlign};
use crate::field::FieldName;
use crate::store::EditorStore;

fn sample_elements() -> Vec<Element> {
    let mut store = EditorStore::new();
    store.add_element(
        ElementDraft::new(ElementKind::text("Invoice"), 40.0, 30.0, 300.0, 48.0)
            .with_style(Style { font_size: Some(28), align: Some(TextAlign::Center), ..Default::default() }),
    );
    store.add_element(ElementDraft::new(ElementKind::image(Some("https://example.test/logo.png".into())), 600.0, 20.0, 150.0, 80.5));
    let field = store.add_element(ElementDraft::toolbar_default(ElementKind::field(FieldName::TotalAmount)));
    store.update_element(
        &field,
        &ElementPatch { prefix: Some("Total: ".into()), suffix: Some(" yen".into()), ..Default::default() },
    );
    store.elements().to_vec()
}

// =============================================================
// export
// =============================================================

#[test]
fn export_wraps_with_version_and_canvas() {
    let doc = export(&[]);
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["version"], "1.0");
    assert_eq!(
        value["canvas"],
        json!({"width": 794, "height": 1123, "unit": "px", "pageFormat": "A4"})
    );
    assert_eq!(value["elements"], json!([]));
}

#[test]
fn canvas_block_is_written_with_integer_dimensions() {
    let text = to_json(&[]).unwrap();
    assert!(text.contains(r#""canvas":{"width":794,"height":1123,"unit":"px","pageFormat":"A4"}"#), "{text}");
}

#[test]
fn canvas_block_matches_geometry_canvas() {
    let spec = CanvasSpec::default();
    assert_eq!(f64::from(spec.width), crate::consts::CANVAS_WIDTH);
    assert_eq!(f64::from(spec.height), crate::consts::CANVAS_HEIGHT);
}

#[test]
fn export_preserves_order() {
    let elements = sample_elements();
    let doc = export(&elements);
    let ids: Vec<_> = doc.elements.iter().map(|e| e.id.clone()).collect();
    let expected: Vec<_> = elements.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids, expected);
}

// =============================================================
// import (strict)
// =============================================================

#[test]
fn roundtrip_is_lossless() {
    let elements = sample_elements();
    let json = to_json(&elements).unwrap();
    assert_eq!(import(&json).unwrap(), elements);
    assert_eq!(import_lenient(&json), elements);
}

#[test]
fn import_missing_elements_is_malformed() {
    let err = import("{}").unwrap_err();
    assert!(matches!(err, LayoutError::MalformedDocument(_)));
}

#[test]
fn import_non_array_elements_is_malformed() {
    let err = import(r#"{"version":"1.0","elements":{"a":1}}"#).unwrap_err();
    assert!(err.to_string().contains("not an array"));
}

#[test]
fn import_invalid_json_is_malformed() {
    assert!(matches!(import("not json").unwrap_err(), LayoutError::MalformedDocument(_)));
    assert!(matches!(import("[1,2]").unwrap_err(), LayoutError::MalformedDocument(_)));
}

#[test]
fn import_reports_bad_element_index() {
    let raw = json!({
        "version": "1.0",
        "elements": [
            {"id": "a", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}, "content": "ok"},
            {"id": "b", "type": "hologram", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}},
        ]
    });
    match import(&raw.to_string()).unwrap_err() {
        LayoutError::MalformedElement { index, .. } => assert_eq!(index, 1),
        other => panic!("expected MalformedElement, got {other:?}"),
    }
}

#[test]
fn import_accepts_other_versions() {
    let raw = r#"{"version":"0.9","elements":[]}"#;
    assert!(import(raw).unwrap().is_empty());
}

#[test]
fn import_accepts_missing_canvas_block() {
    let raw = r#"{"elements":[{"id":"x","type":"image","position":{"x":1,"y":2},"size":{"width":3,"height":4}}]}"#;
    let elements = import(raw).unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].kind, ElementKind::image(None));
}

// =============================================================
// import_lenient
// =============================================================

#[test]
fn lenient_empty_object_yields_empty() {
    assert!(import_lenient("{}").is_empty());
}

#[test]
fn lenient_garbage_yields_empty() {
    assert!(import_lenient("").is_empty());
    assert!(import_lenient("null").is_empty());
    assert!(import_lenient(r#"{"elements":"nope"}"#).is_empty());
}

#[test]
fn lenient_skips_bad_elements_and_keeps_order() {
    let raw = json!({
        "version": "1.0",
        "elements": [
            {"id": "a", "type": "text", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}},
            {"id": "b", "type": "field", "fieldName": "nope", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}},
            {"id": "c", "type": "field", "fieldName": "dueDate", "position": {"x": 0, "y": 0}, "size": {"width": 1, "height": 1}},
        ]
    });
    let elements = import_lenient(&raw.to_string());
    let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}
