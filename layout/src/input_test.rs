use super::*;

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn idle_has_nothing_in_flight() {
    assert!(InputState::Idle.in_flight().is_none());
}

#[test]
fn dragging_reports_current_rect() {
    let id = ElementId::new("a");
    let state = InputState::DraggingElement {
        id: id.clone(),
        start: Point::new(0.0, 0.0),
        orig: Rect::new(0.0, 0.0, 10.0, 10.0),
        current: Rect::new(5.0, 5.0, 10.0, 10.0),
    };
    let (flying, rect) = state.in_flight().unwrap();
    assert_eq!(flying, &id);
    assert_eq!(rect, Rect::new(5.0, 5.0, 10.0, 10.0));
}

#[test]
fn resizing_reports_current_rect() {
    let state = InputState::ResizingElement {
        id: ElementId::new("b"),
        anchor: ResizeAnchor::Se,
        start: Point::new(10.0, 10.0),
        orig: Rect::new(0.0, 0.0, 10.0, 10.0),
        current: Rect::new(0.0, 0.0, 20.0, 30.0),
    };
    assert_eq!(state.in_flight().map(|(_, r)| r), Some(Rect::new(0.0, 0.0, 20.0, 30.0)));
}

#[test]
fn delete_keys() {
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(!Key("Escape".into()).is_delete());
    assert!(Key("Escape".into()).is_escape());
}

#[test]
fn button_equality() {
    assert_eq!(Button::Primary, Button::Primary);
    assert_ne!(Button::Primary, Button::Secondary);
}
