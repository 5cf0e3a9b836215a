//! Panel widget - background quad containing other elements

use super::{render_children, update_children};
use crate::foundation::math::Vec4;
use crate::render::TextureHandle;
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::tree::UiTree;

/// Background panel
#[derive(Debug, Clone)]
pub struct Panel {
    /// Fill colour
    pub background: Vec4,

    /// Optional texture, blank when unset
    pub texture: Option<TextureHandle>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            background: Vec4::new(0.5, 0.5, 0.5, 0.5),
            texture: None,
        }
    }
}

impl Panel {
    /// Panel with the given fill colour
    pub fn with_color(background: Vec4) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    update_children(tree, id, ctx);
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    if let Some(panel) = tree.widget_as::<Panel>(id) {
        ctx.backend
            .draw_quad(panel.texture, tree.bounds_rect(id), panel.background);
    }

    render_children(tree, id, ctx);
}
