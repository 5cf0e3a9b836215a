//! Input field widget - single-line text editing
//!
//! Caret and selection positions are character indices into `text`.
//! Clipboard access goes through the host: copy and cut emit
//! [`UiEvent::ClipboardSet`], paste reads [`InputSnapshot::clipboard`].

use std::ops::Range;

use crate::config::UiConfig;
use crate::events::UiEvent;
use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::input::{InputSnapshot, KeyCode, Modifiers, MouseButton};
use crate::render::{FontHandle, TextMeasurer, TextureHandle};
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::hit_test::element_point;
use crate::ui::tree::UiTree;

/// Inset of the text from the field's top-left corner
const TEXT_INSET: f32 = 5.0;

/// Space kept between the caret and the right edge when scrolling
const CARET_MARGIN: f32 = 10.0;

/// Single-line text input
#[derive(Debug, Clone)]
pub struct InputField {
    /// Current contents
    pub text: String,

    /// Font
    pub font: FontHandle,

    /// Texture for background, selection and caret quads
    pub texture: Option<TextureHandle>,

    /// Text and caret colour
    pub text_color: Vec4,

    /// Background colour
    pub background: Vec4,

    /// Selection highlight colour
    pub selection_color: Vec4,

    focused: bool,
    caret: usize,
    /// (anchor, head)
    selection: Option<(usize, usize)>,
    selecting: bool,
    caret_timer: f32,
    caret_visible: bool,
    scroll: f32,
    repeat: Option<(KeyCode, f32)>,
}

impl Default for InputField {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontHandle::default(),
            texture: None,
            text_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            background: Vec4::new(1.0, 1.0, 1.0, 1.0),
            selection_color: Vec4::new(0.392, 0.584, 0.929, 1.0),
            focused: false,
            caret: 0,
            selection: None,
            selecting: false,
            caret_timer: 0.0,
            caret_visible: true,
            scroll: 0.0,
            repeat: None,
        }
    }
}

impl InputField {
    /// Field pre-filled with `text`, caret at the end
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self {
            text,
            caret,
            ..Self::default()
        }
    }

    /// Field has keyboard focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give or take keyboard focus
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.selecting = false;
            self.selection = None;
        }
    }

    /// Caret position in characters
    pub fn caret_index(&self) -> usize {
        self.caret
    }

    /// Move the caret, clamped to the text, dropping any selection
    pub fn set_caret_index(&mut self, index: usize) {
        self.caret = index.min(self.char_count());
        self.selection = None;
    }

    /// Horizontal text scroll in pixels
    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    /// Caret blink phase
    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Selected character range, `None` when nothing is selected
    pub fn selection_range(&self) -> Option<Range<usize>> {
        let (anchor, head) = self.selection?;
        (anchor != head).then(|| anchor.min(head)..anchor.max(head))
    }

    /// Selected text, empty without a selection
    pub fn selected_text(&self) -> &str {
        match self.selection_range() {
            Some(range) => &self.text[self.byte_at(range.start)..self.byte_at(range.end)],
            None => "",
        }
    }

    /// Select everything and put the caret at the end
    pub fn select_all(&mut self) {
        let len = self.char_count();
        self.selection = Some((0, len));
        self.caret = len;
    }

    /// Replace the selection (if any) with `s` at the caret
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let at = self.byte_at(self.caret);
        self.text.insert_str(at, s);
        self.caret += s.chars().count();
        self.selection = None;
    }

    /// Remove the selected text; returns whether anything was removed
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_range() else {
            return false;
        };

        let bytes = self.byte_at(range.start)..self.byte_at(range.end);
        self.text.replace_range(bytes, "");
        self.caret = range.start;
        self.selection = None;
        true
    }

    /// Apply one key press; returns whether the text changed
    pub fn handle_key(&mut self, key: KeyCode, modifiers: Modifiers) -> bool {
        let len = self.char_count();

        match key {
            KeyCode::Left => {
                self.move_caret(self.caret.saturating_sub(1), modifiers.shift);
                false
            }
            KeyCode::Right => {
                self.move_caret((self.caret + 1).min(len), modifiers.shift);
                false
            }
            KeyCode::Home => {
                self.move_caret(0, modifiers.shift);
                false
            }
            KeyCode::End => {
                self.move_caret(len, modifiers.shift);
                false
            }
            KeyCode::Backspace => {
                let changed = self.delete_selection() || self.remove_char_before_caret();
                self.selection = None;
                changed
            }
            KeyCode::Delete => {
                let changed = self.delete_selection() || self.remove_char_at_caret();
                self.selection = None;
                changed
            }
            KeyCode::A | KeyCode::C | KeyCode::V | KeyCode::X if modifiers.ctrl => false,
            _ => match key.to_char(modifiers.shift) {
                Some(c) => {
                    self.insert_str(c.encode_utf8(&mut [0; 4]));
                    true
                }
                None => false,
            },
        }
    }

    /// Caret index closest to `x`, measured from the start of the text
    pub fn caret_index_at<M: TextMeasurer + ?Sized>(&self, x: f32, measurer: &M) -> usize {
        let len = self.char_count();
        let mut index = 0;

        for i in 0..=len {
            let width = measurer.measure_text(self.font, self.prefix(i)).x;
            if width > x {
                index = i.saturating_sub(1);
                break;
            }
            index = i;
        }

        index.min(len)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, index: usize) -> usize {
        self.text
            .char_indices()
            .nth(index)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn prefix(&self, index: usize) -> &str {
        &self.text[..self.byte_at(index)]
    }

    fn move_caret(&mut self, target: usize, extend: bool) {
        if extend {
            let anchor = self.selection.map_or(self.caret, |(anchor, _)| anchor);
            self.selection = Some((anchor, target));
        } else {
            self.selection = None;
        }
        self.caret = target;
    }

    fn remove_char_before_caret(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        self.remove_char_at_caret()
    }

    fn remove_char_at_caret(&mut self) -> bool {
        if self.caret >= self.char_count() {
            return false;
        }
        let start = self.byte_at(self.caret);
        self.text.remove(start);
        true
    }

    /// Keys to apply this frame, synthesising repeats for a held key
    fn keys_to_process(&mut self, input: &InputSnapshot, dt: f32, config: &UiConfig) -> Vec<KeyCode> {
        let pressed = input.keys_pressed();
        if let Some(&first) = pressed.first() {
            self.repeat = Some((first, 0.0));
            return pressed.to_vec();
        }

        match self.repeat {
            Some((key, timer)) if input.is_key_held(key) => {
                let timer = timer + dt;
                if timer >= config.key_repeat_delay {
                    self.repeat = Some((key, timer - config.key_repeat_rate));
                    vec![key]
                } else {
                    self.repeat = Some((key, timer));
                    Vec::new()
                }
            }
            _ => {
                self.repeat = None;
                Vec::new()
            }
        }
    }

    fn blink(&mut self, dt: f32, interval: f32) {
        self.caret_timer += dt;
        if self.caret_timer >= interval {
            self.caret_timer = 0.0;
            self.caret_visible = !self.caret_visible;
        }
    }

    fn keep_caret_visible<M: TextMeasurer + ?Sized>(&mut self, width: f32, measurer: &M) {
        let caret_x = measurer.measure_text(self.font, self.prefix(self.caret)).x;
        if caret_x - self.scroll > width - CARET_MARGIN {
            self.scroll = caret_x - width + CARET_MARGIN;
        }
        if caret_x - self.scroll < 0.0 {
            self.scroll = caret_x;
        }
    }
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    if !tree.is_enabled(id) || !tree.is_visible(id) {
        return;
    }

    let screen = ctx.input.pointer();
    let pointer = element_point(tree, ctx.camera, id, screen);
    let over = ctx.hit().event_point(tree, id, screen);
    let origin = tree.position(id);
    let width = tree.size(id).x;
    let input = ctx.input;
    let config = ctx.config;
    let measurer = ctx.measurer;
    let dt = ctx.delta();

    let Some(field) = tree.widget_as_mut::<InputField>(id) else {
        return;
    };

    let was_focused = field.focused;
    let before = field.text.clone();
    let mut clipboard = None;
    let pointer_x = pointer.x - origin.x - TEXT_INSET + field.scroll;

    if input.is_pressed(MouseButton::Left) {
        if over {
            field.focused = true;
            let index = field.caret_index_at(pointer_x, measurer);
            let anchor = if input.modifiers().shift {
                field.selection.map_or(field.caret, |(anchor, _)| anchor)
            } else {
                index
            };
            field.caret = index;
            field.selection = Some((anchor, index));
            field.selecting = true;
        } else {
            field.set_focused(false);
        }
    }

    if field.selecting && input.is_held(MouseButton::Left) {
        let index = field.caret_index_at(pointer_x, measurer);
        let anchor = field.selection.map_or(field.caret, |(anchor, _)| anchor);
        field.caret = index;
        field.selection = Some((anchor, index));
    } else if !input.is_held(MouseButton::Left) {
        field.selecting = false;
    }

    if field.focused {
        let modifiers = input.modifiers();
        if modifiers.ctrl {
            if input.is_key_pressed(KeyCode::A) {
                field.select_all();
            } else if input.is_key_pressed(KeyCode::C) {
                clipboard = Some(field.selected_text().to_string());
            } else if input.is_key_pressed(KeyCode::V) {
                field.insert_str(input.clipboard().unwrap_or(""));
            } else if input.is_key_pressed(KeyCode::X) {
                clipboard = Some(field.selected_text().to_string());
                field.delete_selection();
            }
        }

        for key in field.keys_to_process(input, dt, config) {
            field.handle_key(key, modifiers);
        }
    }

    field.blink(dt, config.caret_blink_interval);
    field.keep_caret_visible(width, measurer);

    let focused = field.focused;
    let changed = field.text != before;

    if focused != was_focused {
        ctx.emit(UiEvent::FocusChanged { id, focused });
    }
    if changed {
        log::trace!("InputField {:?} text changed", id);
        ctx.emit(UiEvent::TextChanged { id });
    }
    if let Some(text) = clipboard {
        ctx.emit(UiEvent::ClipboardSet(text));
    }
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    let bounds = tree.bounds_rect(id);
    let Some(field) = tree.widget_as::<InputField>(id) else {
        return;
    };

    ctx.backend.draw_quad(field.texture, bounds, field.background);

    let text_pos = bounds.position() + Vec2::new(TEXT_INSET, TEXT_INSET);
    let line_height = ctx.backend.line_height(field.font);
    let previous = ctx.push_scissor(bounds);

    if let Some(range) = field.selection_range() {
        let start = ctx.backend.measure_text(field.font, field.prefix(range.start)).x;
        let end = ctx.backend.measure_text(field.font, field.prefix(range.end)).x;
        let highlight = Rect::new(text_pos.x + start - field.scroll, text_pos.y, end - start, line_height);
        ctx.backend.draw_quad(field.texture, highlight, field.selection_color);
    }

    ctx.backend.draw_text(
        field.font,
        &field.text,
        text_pos - Vec2::new(field.scroll, 0.0),
        field.text_color,
        1.0,
    );

    if field.focused && field.caret_visible {
        let caret_x = ctx.backend.measure_text(field.font, field.prefix(field.caret)).x;
        let caret = Rect::new(text_pos.x + caret_x - field.scroll, text_pos.y, 1.0, line_height);
        ctx.backend.draw_quad(field.texture, caret, field.text_color);
    }

    ctx.pop_scissor(previous);
}
