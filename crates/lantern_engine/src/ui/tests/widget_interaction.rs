//! Input-driven widget scenarios

use super::Frame;
use crate::events::UiEvent;
use crate::foundation::math::Vec2;
use crate::input::{InputSnapshot, KeyCode, Modifiers, MouseButton};
use crate::ui::{Button, ButtonState, ContentSize, ElementNode, InputField, Panel, ScrollView};
use approx::assert_relative_eq;

#[test]
fn test_overlapping_buttons_only_top_clicks() {
    let mut f = Frame::new();
    let a = f.root(ElementNode::new(Button::new("a")).at(0.0, 0.0).sized(100.0, 100.0).ordered(0, 0));
    let b = f.root(ElementNode::new(Button::new("b")).at(50.0, 50.0).sized(100.0, 100.0).ordered(0, 1));

    let events = f.step(
        InputSnapshot::builder()
            .pointer(75.0, 75.0)
            .press(MouseButton::Left)
            .build(),
    );

    assert_eq!(
        events,
        vec![UiEvent::HoverChanged { id: b, hovered: true }, UiEvent::Clicked(b)]
    );
    assert_eq!(f.tree.widget_as::<Button>(a).unwrap().state(), ButtonState::Normal);
    assert_eq!(f.tree.widget_as::<Button>(b).unwrap().state(), ButtonState::Pressed);
}

#[test]
fn test_disabled_button_never_clicks() {
    let mut f = Frame::new();
    let button = f.root(ElementNode::new(Button::new("off")).sized(100.0, 30.0));
    f.tree.get_mut(button).unwrap().set_enabled(false);

    let events = f.step(
        InputSnapshot::builder()
            .pointer(10.0, 10.0)
            .press(MouseButton::Left)
            .build(),
    );

    assert!(events.is_empty());
    assert_eq!(f.tree.widget_as::<Button>(button).unwrap().state(), ButtonState::Disabled);
}

#[test]
fn test_hover_leaves_button() {
    let mut f = Frame::new();
    let button = f.root(ElementNode::new(Button::new("h")).sized(100.0, 30.0));

    let frame = InputSnapshot::builder().pointer(10.0, 10.0).build();
    f.step(frame.clone());
    let events = f.step(frame.next_frame().pointer(300.0, 300.0).build());

    assert_eq!(events, vec![UiEvent::HoverChanged { id: button, hovered: false }]);
}

#[test]
fn test_drag_scrolls_through_child() {
    let mut f = Frame::new();
    let scroll = f.root(ElementNode::new(ScrollView::default()).sized(200.0, 300.0));
    f.child(scroll, ElementNode::new(Panel::default()).sized(200.0, 600.0));

    let press = InputSnapshot::builder()
        .pointer(50.0, 100.0)
        .press(MouseButton::Left)
        .build();
    f.step(press.clone());
    assert!(f.tree.widget_as::<ScrollView>(scroll).unwrap().is_dragging());

    let events = f.step(press.next_frame().pointer(50.0, 60.0).build());
    let view = f.tree.widget_as::<ScrollView>(scroll).unwrap();

    assert_relative_eq!(view.offset().y, 40.0);
    assert_eq!(
        events,
        vec![UiEvent::ScrollChanged { id: scroll, offset: Vec2::new(0.0, 40.0) }]
    );
}

#[test]
fn test_overscroll_springs_back() {
    let mut f = Frame::new();
    let scroll = f.root(ElementNode::new(ScrollView::default()).sized(200.0, 300.0));
    {
        let view = f.tree.widget_as_mut::<ScrollView>(scroll).unwrap();
        view.content_size = ContentSize::Fixed(Vec2::new(200.0, 600.0));
        view.set_offset(Vec2::new(0.0, 650.0));
    }

    f.step(InputSnapshot::new());

    let view = f.tree.widget_as::<ScrollView>(scroll).unwrap();
    assert_relative_eq!(view.offset().y, 562.5);
    assert_eq!(view.velocity().y, 0.0);
}

#[test]
fn test_wheel_only_over_view() {
    let mut f = Frame::new();
    let scroll = f.root(ElementNode::new(ScrollView::default()).sized(200.0, 300.0));
    f.tree.widget_as_mut::<ScrollView>(scroll).unwrap().content_size =
        ContentSize::Fixed(Vec2::new(200.0, 600.0));

    f.step(InputSnapshot::builder().pointer(500.0, 500.0).wheel(0.0, -4.0).build());
    assert_eq!(f.tree.widget_as::<ScrollView>(scroll).unwrap().velocity(), Vec2::zeros());

    f.step(InputSnapshot::builder().pointer(50.0, 50.0).wheel(0.0, -4.0).build());
    assert_relative_eq!(f.tree.widget_as::<ScrollView>(scroll).unwrap().velocity().y, 0.9);
}

#[test]
fn test_input_field_edit_session() {
    let mut f = Frame::new();
    let field = f.root(ElementNode::new(InputField::default()).sized(120.0, 30.0));
    let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };

    let click = InputSnapshot::builder()
        .pointer(10.0, 10.0)
        .press(MouseButton::Left)
        .build();
    let events = f.step(click.clone());
    assert_eq!(events, vec![UiEvent::FocusChanged { id: field, focused: true }]);

    let typed = click
        .next_frame()
        .release(MouseButton::Left)
        .key_press(KeyCode::H)
        .key_press(KeyCode::I)
        .build();
    let events = f.step(typed.clone());
    assert_eq!(events, vec![UiEvent::TextChanged { id: field }]);
    assert_eq!(f.tree.widget_as::<InputField>(field).unwrap().text, "hi");

    let select_all = typed
        .next_frame()
        .key_release(KeyCode::H)
        .key_release(KeyCode::I)
        .modifiers(ctrl)
        .key_press(KeyCode::A)
        .build();
    f.step(select_all.clone());

    let copy = select_all
        .next_frame()
        .key_release(KeyCode::A)
        .key_press(KeyCode::C)
        .build();
    let events = f.step(copy.clone());
    assert_eq!(events, vec![UiEvent::ClipboardSet("hi".to_string())]);

    let paste = copy
        .next_frame()
        .key_release(KeyCode::C)
        .key_press(KeyCode::V)
        .clipboard("yo")
        .build();
    f.step(paste.clone());
    assert_eq!(f.tree.widget_as::<InputField>(field).unwrap().text, "yo");

    let click_away = paste
        .next_frame()
        .key_release(KeyCode::V)
        .modifiers(Modifiers::default())
        .pointer(500.0, 500.0)
        .press(MouseButton::Left)
        .build();
    let events = f.step(click_away);
    assert_eq!(events, vec![UiEvent::FocusChanged { id: field, focused: false }]);
}
