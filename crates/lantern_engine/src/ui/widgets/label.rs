//! Label widget - static text
//!
//! A label never accepts events. Its size tracks the measured text so
//! layouts can stack it, except inside a grid, which sizes its cells.

use crate::foundation::math::{Vec2, Vec4};
use crate::render::{FontHandle, TextMeasurer};
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::tree::UiTree;
use crate::ui::widgets::{LayoutContainer, LayoutKind, Widget};

/// Text label
#[derive(Debug, Clone)]
pub struct Label {
    /// Displayed text
    pub text: String,

    /// Font
    pub font: FontHandle,

    /// Text colour
    pub color: Vec4,

    /// Pivot in unscaled text space, subtracted from the position
    pub origin: Vec2,

    /// Text scale
    pub scale: f32,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontHandle::default(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            origin: Vec2::zeros(),
            scale: 1.0,
        }
    }
}

impl Label {
    /// Label showing `text` with the default font
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Scaled size of the text, zero when empty
    pub fn measure<M: TextMeasurer + ?Sized>(&self, measurer: &M) -> Vec2 {
        if self.text.is_empty() {
            return Vec2::zeros();
        }
        measurer.measure_text(self.font, &self.text) * self.scale
    }
}

/// The parent grid owns this element's size
fn sized_by_grid(tree: &UiTree, id: ElementId) -> bool {
    tree.parent(id)
        .and_then(|parent| tree.widget_as::<LayoutContainer>(parent))
        .is_some_and(|layout| matches!(layout.kind, LayoutKind::Grid { .. }))
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    let keep_size = sized_by_grid(tree, id);
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    node.set_accepts_events(false);

    if let Widget::Label(label) = &node.widget {
        if !keep_size {
            node.size = label.measure(ctx.measurer);
        }
    }
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    let position = tree.position(id);
    let Some(label) = tree.widget_as::<Label>(id) else {
        return;
    };
    if label.text.is_empty() {
        return;
    }

    let size = label.measure(&*ctx.backend);
    let draw_at = position - label.origin * label.scale;
    ctx.backend
        .draw_text(label.font, &label.text, draw_at, label.color, label.scale);

    if sized_by_grid(tree, id) {
        return;
    }
    if let Some(node) = tree.get_mut(id) {
        node.size = size;
    }
}
