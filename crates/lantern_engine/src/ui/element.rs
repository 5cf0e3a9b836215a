//! UI element node
//!
//! One node of the retained tree. Behaviour lives in the [`Widget`] variant
//! it carries; geometry, visibility and ordering keys are common to all.

use crate::foundation::math::{Rect, Vec2};
use crate::ui::widgets::Widget;
use bitflags::bitflags;
use std::sync::atomic::{AtomicU32, Ordering};

slotmap::new_key_type! {
    /// Handle to an element in a [`UiTree`](super::UiTree)
    pub struct ElementId;
}

/// Identifier of a [`UiManager`](super::UiManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    /// Issue a process-unique id
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

bitflags! {
    /// Element capability flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u32 {
        /// Element's own visibility flag (ancestors may still hide it)
        const VISIBLE_SELF = 1 << 0;
        /// Element reacts to input
        const ENABLED = 1 << 1;
        /// Element can be the target of event-only hit queries
        const ACCEPTS_EVENTS = 1 << 2;
        /// Element lives in world space; pointer queries go through the camera
        const WORLD_SPACE = 1 << 3;
        /// Resolve a missing manager through ancestors, then the active manager
        const AUTO_FALLBACK_MANAGER = 1 << 4;
        /// Hidden by the innermost enclosing scroll view's viewport for the
        /// current pass; never set outside a clip scope
        const CLIPPED = 1 << 5;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE_SELF | Self::ENABLED | Self::ACCEPTS_EVENTS | Self::AUTO_FALLBACK_MANAGER
    }
}

/// A node in the element tree
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) manager: Option<ManagerId>,

    /// Offset from the parent's global position
    pub local_position: Vec2,

    /// Width and height
    pub size: Vec2,

    /// Explicit clip rectangle, overriding the bounds for containment
    pub clip_rect: Option<Rect>,

    /// Coarse z-bucket; higher layers draw on top
    pub render_layer: i32,

    /// Tie-break within a layer; higher draws later
    pub render_order: i32,

    /// Capability flags
    pub flags: ElementFlags,

    /// Behaviour and widget state
    pub widget: Widget,
}

impl ElementNode {
    /// Create a detached node for a widget, using the widget's default size
    pub fn new(widget: impl Into<Widget>) -> Self {
        let widget = widget.into();
        let mut flags = ElementFlags::default();
        if !widget.accepts_events_by_default() {
            flags.remove(ElementFlags::ACCEPTS_EVENTS);
        }

        Self {
            parent: None,
            children: Vec::new(),
            manager: None,
            local_position: Vec2::zeros(),
            size: widget.default_size(),
            clip_rect: None,
            render_layer: 0,
            render_order: 0,
            flags,
            widget,
        }
    }

    /// Set the local position
    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.local_position = Vec2::new(x, y);
        self
    }

    /// Set the size
    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    /// Set the render layer and order
    #[must_use]
    pub fn ordered(mut self, layer: i32, order: i32) -> Self {
        self.render_layer = layer;
        self.render_order = order;
        self
    }

    /// Mark the node as living in world space
    #[must_use]
    pub fn world_space(mut self) -> Self {
        self.flags.insert(ElementFlags::WORLD_SPACE);
        self
    }

    /// Parent, if attached
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Manager explicitly assigned to this node
    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    /// Own visibility flag, false while a scroll view clips the element away
    pub fn visible_self(&self) -> bool {
        self.flags.contains(ElementFlags::VISIBLE_SELF) && !self.is_clipped()
    }

    /// Set the own visibility flag
    ///
    /// Scroll view clipping is tracked separately and does not touch this flag.
    pub fn set_visible_self(&mut self, visible: bool) {
        self.flags.set(ElementFlags::VISIBLE_SELF, visible);
    }

    /// Outside the viewport of the scroll view currently shifting it
    pub fn is_clipped(&self) -> bool {
        self.flags.contains(ElementFlags::CLIPPED)
    }

    pub(crate) fn set_clipped(&mut self, clipped: bool) {
        self.flags.set(ElementFlags::CLIPPED, clipped);
    }

    /// Enabled flag
    pub fn enabled(&self) -> bool {
        self.flags.contains(ElementFlags::ENABLED)
    }

    /// Set the enabled flag
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(ElementFlags::ENABLED, enabled);
    }

    /// Accepts-events flag
    pub fn accepts_events(&self) -> bool {
        self.flags.contains(ElementFlags::ACCEPTS_EVENTS)
    }

    /// Set the accepts-events flag
    pub fn set_accepts_events(&mut self, accepts: bool) {
        self.flags.set(ElementFlags::ACCEPTS_EVENTS, accepts);
    }

    /// World-space flag
    pub fn is_world_space(&self) -> bool {
        self.flags.contains(ElementFlags::WORLD_SPACE)
    }

    /// Auto-fallback manager flag
    pub fn auto_fallback_manager(&self) -> bool {
        self.flags.contains(ElementFlags::AUTO_FALLBACK_MANAGER)
    }
}
