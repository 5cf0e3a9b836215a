//! Scroll view widget
//!
//! A clipped viewport over its children. Children keep their unscrolled
//! local positions; the scroll offset is applied only for the duration of
//! the children's update or render call (the "clip scope") and undone
//! right after, together with the per-leaf visibility and clip overrides.
//! A leaf's visibility override is recomputed from the viewport by each
//! nested scope and never replaces the host's own visibility flag.
//!
//! Motion is a small state machine: idle or dragging. Dragging moves the
//! offset with the pointer and records the delta as velocity, idle frames
//! integrate that velocity. Velocity is damped every frame and overshoot
//! past the content range springs back elastically.

use super::{render_children, update_children, Widget};
use crate::config::UiConfig;
use crate::events::UiEvent;
use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::input::MouseButton;
use crate::render::TextureHandle;
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::hit_test::element_point;
use crate::ui::tree::UiTree;

/// How the scrollable extent is determined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentSize {
    /// Union of the children's subtree bounds, own size without children
    FitContent,
    /// Fixed extent
    Fixed(Vec2),
}

/// Scrollable container
#[derive(Debug, Clone)]
pub struct ScrollView {
    /// Background colour
    pub background: Vec4,

    /// Optional background texture
    pub texture: Option<TextureHandle>,

    /// Scrollable extent
    pub content_size: ContentSize,

    /// Vertical scrolling enabled
    pub has_vertical: bool,

    /// Horizontal scrolling enabled
    pub has_horizontal: bool,

    offset: Vec2,
    velocity: Vec2,
    dragging: bool,
    last_pointer: Vec2,
    reported_offset: Vec2,
    clip_scope_active: bool,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self {
            background: Vec4::new(0.5, 0.5, 0.5, 0.2),
            texture: None,
            content_size: ContentSize::FitContent,
            has_vertical: true,
            has_horizontal: false,
            offset: Vec2::zeros(),
            velocity: Vec2::zeros(),
            dragging: false,
            last_pointer: Vec2::zeros(),
            reported_offset: Vec2::zeros(),
            clip_scope_active: false,
        }
    }
}

impl ScrollView {
    /// Current scroll offset
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Jump to an offset; the elastic pull still applies on the next update
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Current momentum in offset units
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Replace the momentum
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// A drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Children are currently shifted and clipped by this view
    pub fn is_clip_scope_active(&self) -> bool {
        self.clip_scope_active
    }

    /// Continue another view's scroll state (offset, momentum, drag)
    pub fn transfer_scroll_from(&mut self, other: &ScrollView) {
        self.offset = other.offset;
        self.velocity = other.velocity;
        self.dragging = other.dragging;
        self.last_pointer = other.last_pointer;
    }

    /// Largest in-range offset per axis
    pub fn max_offset(content: Vec2, viewport: Vec2) -> Vec2 {
        Vec2::new(
            (content.x - viewport.x).max(0.0),
            (content.y - viewport.y).max(0.0),
        )
    }

    /// Integrate momentum, damp it, pull overshoot back and zero disabled axes
    fn step(&mut self, content: Vec2, viewport: Vec2, dt: f32, config: &UiConfig) {
        if !self.dragging {
            self.offset += self.velocity * dt * config.scroll_speed;
        }
        self.velocity *= config.scroll_damping;

        let max = Self::max_offset(content, viewport);
        for axis in 0..2 {
            if self.offset[axis] < 0.0 {
                self.offset[axis] -= self.offset[axis] * config.scroll_elastic_strength;
                self.velocity[axis] = 0.0;
            } else if self.offset[axis] > max[axis] {
                let overshoot = self.offset[axis] - max[axis];
                self.offset[axis] -= overshoot * config.scroll_elastic_strength;
                self.velocity[axis] = 0.0;
            }
        }

        if !self.has_horizontal {
            self.offset.x = 0.0;
            self.velocity.x = 0.0;
        }
        if !self.has_vertical {
            self.offset.y = 0.0;
            self.velocity.y = 0.0;
        }
    }
}

/// Scrollable extent of a scroll view element
pub fn resolved_content_size(tree: &UiTree, id: ElementId) -> Vec2 {
    match tree.widget_as::<ScrollView>(id).map(|scroll| scroll.content_size) {
        Some(ContentSize::Fixed(size)) => size,
        _ => tree
            .children_bounds(id)
            .map_or(tree.size(id), |bounds| bounds.size()),
    }
}

/// Saved state of one clip scope
struct ClipScope {
    shifted: Vec<(ElementId, Vec2)>,
    /// (leaf, clipped flag, clip rect) as they were before this scope
    leaves: Vec<(ElementId, bool, Option<Rect>)>,
}

impl ClipScope {
    /// Shift the children by the offset and clip every leaf to the view
    fn apply(tree: &mut UiTree, id: ElementId) -> Self {
        let offset = tree
            .widget_as::<ScrollView>(id)
            .map_or(Vec2::zeros(), ScrollView::offset);

        let shifted: Vec<(ElementId, Vec2)> = tree
            .children(id)
            .iter()
            .map(|&child| (child, tree.local_position(child)))
            .collect();
        for &(child, local) in &shifted {
            tree.set_local_position(child, local - offset);
        }

        let view = view_rect(tree, id);
        let mut leaves = Vec::new();
        for node_id in tree.descendants(id) {
            if !tree.children(node_id).is_empty() {
                continue;
            }

            let bounds = tree.bounds_rect(node_id);
            if let Some(node) = tree.get_mut(node_id) {
                leaves.push((node_id, node.is_clipped(), node.clip_rect));
                node.set_clipped(!view.intersects(&bounds));
                node.clip_rect = Some(view.intersection(&bounds));
            }
        }

        if let Some(scroll) = tree.widget_as_mut::<ScrollView>(id) {
            scroll.clip_scope_active = true;
        }

        Self { shifted, leaves }
    }

    /// Undo every override made by [`ClipScope::apply`]
    fn restore(self, tree: &mut UiTree, id: ElementId) {
        for (leaf, clipped, clip) in self.leaves.into_iter().rev() {
            if let Some(node) = tree.get_mut(leaf) {
                node.set_clipped(clipped);
                node.clip_rect = clip;
            }
        }
        for (child, local) in self.shifted {
            tree.set_local_position(child, local);
        }

        if let Some(scroll) = tree.widget_as_mut::<ScrollView>(id) {
            scroll.clip_scope_active = false;
        }
    }
}

/// Viewport of a scroll view, cut down by enclosing scroll views
fn view_rect(tree: &UiTree, id: ElementId) -> Rect {
    let mut view = tree.bounds_rect(id);
    let mut current = tree.parent(id);

    while let Some(ancestor) = current {
        if let Some(Widget::ScrollView(scroll)) = tree.widget(ancestor) {
            if scroll.is_clip_scope_active() {
                view = view.intersection(&tree.bounds_rect(ancestor));
            }
        }
        current = tree.parent(ancestor);
    }

    view
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    if !tree.is_enabled(id) || !tree.is_visible(id) {
        return;
    }

    let screen = ctx.input.pointer();
    let pointer = element_point(tree, ctx.camera, id, screen);
    let over = ctx.hit().event_passthrough_point(tree, id, screen);
    let content = resolved_content_size(tree, id);
    let viewport = tree.size(id);
    let input = ctx.input;
    let config = ctx.config;
    let dt = ctx.delta();

    let Some(scroll) = tree.widget_as_mut::<ScrollView>(id) else {
        return;
    };

    if over {
        let wheel = input.wheel_delta();
        if scroll.has_vertical {
            scroll.velocity.y -= wheel.y * config.scroll_wheel_factor;
        }
        if scroll.has_horizontal {
            scroll.velocity.x += wheel.x * config.scroll_wheel_factor;
        }

        if !scroll.dragging && input.is_pressed(MouseButton::Left) {
            scroll.dragging = true;
            scroll.last_pointer = pointer;
        }
    }

    if scroll.dragging && input.is_held(MouseButton::Left) {
        let delta = pointer - scroll.last_pointer;
        if scroll.has_vertical {
            scroll.offset.y -= delta.y;
            scroll.velocity.y = -delta.y;
        }
        if scroll.has_horizontal {
            scroll.offset.x -= delta.x;
            scroll.velocity.x = -delta.x;
        }
        scroll.last_pointer = pointer;
    }
    if input.is_released(MouseButton::Left) || !input.is_held(MouseButton::Left) {
        scroll.dragging = false;
    }

    scroll.step(content, viewport, dt, config);

    if scroll.offset != scroll.reported_offset {
        scroll.reported_offset = scroll.offset;
        let offset = scroll.offset;
        ctx.emit(UiEvent::ScrollChanged { id, offset });
    }

    let scope = ClipScope::apply(tree, id);
    update_children(tree, id, ctx);
    scope.restore(tree, id);
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    let bounds = tree.bounds_rect(id);
    if let Some(scroll) = tree.widget_as::<ScrollView>(id) {
        ctx.backend.draw_quad(scroll.texture, bounds, scroll.background);
    }

    let previous = ctx.push_scissor(bounds);
    let scope = ClipScope::apply(tree, id);
    render_children(tree, id, ctx);
    scope.restore(tree, id);
    ctx.pop_scissor(previous);
}
