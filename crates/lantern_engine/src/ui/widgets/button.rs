//! Button widget - interactive clickable buttons

use crate::events::UiEvent;
use crate::foundation::math::{Vec2, Vec4};
use crate::input::MouseButton;
use crate::render::{FontHandle, TextureHandle};
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::tree::UiTree;

/// Button state for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Normal resting state
    #[default]
    Normal,
    /// Mouse is hovering over button
    Hovered,
    /// Button is being pressed
    Pressed,
    /// Button is disabled (non-interactive)
    Disabled,
}

/// UI button
#[derive(Debug, Clone)]
pub struct Button {
    /// Button label text
    pub text: String,

    /// Font for the label
    pub font: FontHandle,

    /// Optional background texture, blank when unset
    pub texture: Option<TextureHandle>,

    /// Label scale
    pub text_scale: f32,

    /// Offset applied to the centred label
    pub text_offset: Vec2,

    /// Label colour
    pub text_color: Vec4,

    /// Resting background colour
    pub normal_color: Vec4,
    /// Hover background colour
    pub hover_color: Vec4,
    /// Pressed background colour
    pub pressed_color: Vec4,

    /// Draw the label in the current background colour
    pub text_matches_background: bool,

    state: ButtonState,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontHandle::default(),
            texture: None,
            text_scale: 1.0,
            text_offset: Vec2::zeros(),
            text_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            normal_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            hover_color: Vec4::new(0.83, 0.83, 0.83, 1.0),
            pressed_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            text_matches_background: false,
            state: ButtonState::Normal,
        }
    }
}

impl Button {
    /// Button with a label
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Visual state computed by the last update
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Pointer is over the button
    pub fn is_hovered(&self) -> bool {
        matches!(self.state, ButtonState::Hovered | ButtonState::Pressed)
    }

    /// Background colour for the current state
    pub fn current_color(&self) -> Vec4 {
        match self.state {
            ButtonState::Pressed => self.pressed_color,
            ButtonState::Hovered => self.hover_color,
            ButtonState::Normal | ButtonState::Disabled => self.normal_color,
        }
    }
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    let pointer = ctx.input.pointer();
    let hovered = ctx.hit().event_point(tree, id, pointer);
    let active = tree.is_enabled(id) && tree.is_visible(id);

    let Some(button) = tree.widget_as_mut::<Button>(id) else {
        return;
    };
    let was_hovered = button.is_hovered();

    let mut clicked = false;
    button.state = if !active {
        ButtonState::Disabled
    } else if hovered {
        clicked = ctx.input.is_pressed(MouseButton::Left);
        if ctx.input.is_held(MouseButton::Left) {
            ButtonState::Pressed
        } else {
            ButtonState::Hovered
        }
    } else {
        ButtonState::Normal
    };

    let now_hovered = button.is_hovered();
    if now_hovered != was_hovered {
        ctx.emit(UiEvent::HoverChanged {
            id,
            hovered: now_hovered,
        });
    }
    if clicked {
        log::debug!("Button {:?} clicked", id);
        ctx.emit(UiEvent::Clicked(id));
    }
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    let bounds = tree.bounds_rect(id);
    let Some(button) = tree.widget_as::<Button>(id) else {
        return;
    };

    let color = button.current_color();
    ctx.backend.draw_quad(button.texture, bounds, color);

    if !button.text.is_empty() {
        let text_size = ctx.backend.measure_text(button.font, &button.text) * button.text_scale;
        let position = bounds.position() + button.text_offset + (bounds.size() - text_size) / 2.0;
        let tint = if button.text_matches_background {
            color
        } else {
            button.text_color
        };
        ctx.backend
            .draw_text(button.font, &button.text, position, tint, button.text_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;

    #[test]
    fn test_color_follows_state() {
        let mut button = Button::new("ok");
        assert_eq!(button.current_color(), button.normal_color);

        button.state = ButtonState::Pressed;
        assert_eq!(button.current_color(), button.pressed_color);

        button.state = ButtonState::Disabled;
        assert_eq!(button.current_color(), button.normal_color);
        assert!(!button.is_hovered());
    }

    #[test]
    fn test_label_is_centred() {
        let bounds = Rect::new(0.0, 0.0, 120.0, 30.0);
        let text_size = Vec2::new(16.0, 16.0);
        let position = bounds.position() + (bounds.size() - text_size) / 2.0;
        assert_eq!(position, Vec2::new(52.0, 7.0));
    }
}
