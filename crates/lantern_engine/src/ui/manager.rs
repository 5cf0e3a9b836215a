//! UI Manager
//!
//! Owns the frame's render universe: persistent root elements, single-frame
//! immediate elements and one-shot draw callbacks. One ordering function
//! drives both painting and hit resolution so they can never disagree.

use super::context::{BackendMeasurer, FrameInput, RenderContext, UpdateContext};
use super::element::{ElementId, ElementNode, ManagerId};
use super::hit_test::element_point;
use super::tree::UiTree;
use super::widgets::{self, Widget};
use crate::foundation::math::{Rect, Vec2};
use crate::input::InputSnapshot;
use crate::render::{Camera2D, DrawStateStack, RenderBackend, RenderTargetId, TextMeasurer};

/// One-shot draw callback executed in render order
pub type DrawCallback = Box<dyn FnOnce(&mut RenderContext<'_>)>;

/// Immediate element awaiting its update/render cycle
#[derive(Debug, Clone, Copy)]
struct Immediate {
    id: ElementId,
    updated: bool,
}

/// Queued draw callback with its ordering keys
struct QueuedCallback {
    layer: i32,
    order: i32,
    callback: DrawCallback,
}

/// Item of the frame's draw set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderItem {
    Element(ElementId),
    Callback(usize),
}

/// Central UI management system
pub struct UiManager {
    /// Identity used for element back-references
    id: ManagerId,

    /// Persistent root elements in insertion order
    roots: Vec<ElementId>,

    /// Single-frame elements, in enqueue order
    immediates: Vec<Immediate>,

    /// Single-frame draw callbacks, in enqueue order
    callbacks: Vec<QueuedCallback>,
}

impl Default for UiManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UiManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiManager")
            .field("id", &self.id)
            .field("roots", &self.roots)
            .field("immediates", &self.immediates)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl UiManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            id: ManagerId::next(),
            roots: Vec::new(),
            immediates: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// Identity of this manager
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Persistent roots in insertion order
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Number of immediate elements waiting for their cycle
    pub fn pending_immediates(&self) -> usize {
        self.immediates.len()
    }

    /// Number of queued draw callbacks
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.len()
    }

    /// Register a persistent root element
    pub fn add_element(&mut self, tree: &mut UiTree, id: ElementId) {
        tree.set_manager(id, Some(self.id));
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Unregister a root element and clear its manager reference
    pub fn remove_element(&mut self, tree: &mut UiTree, id: ElementId) {
        self.roots.retain(|&root| root != id);
        tree.set_manager(id, None);
    }

    /// Move a root to the end of the insertion order
    pub fn bring_to_front(&mut self, id: ElementId) {
        if let Some(index) = self.roots.iter().position(|&root| root == id) {
            let root = self.roots.remove(index);
            self.roots.push(root);
        }
    }

    /// Move a root to the start of the insertion order
    pub fn send_to_back(&mut self, id: ElementId) {
        if let Some(index) = self.roots.iter().position(|&root| root == id) {
            let root = self.roots.remove(index);
            self.roots.insert(0, root);
        }
    }

    /// Release every root element
    ///
    /// The elements stay in the tree with their children attached; they are
    /// simply no longer updated, drawn or hit-tested by this manager.
    pub fn clear(&mut self) {
        log::debug!("UiManager {:?} cleared ({} roots)", self.id, self.roots.len());
        self.roots.clear();
    }

    /// Queue an element that lives for exactly one update/render cycle
    ///
    /// `setup` configures the node before it is queued. The returned id can
    /// be used to attach children; the whole subtree is destroyed once the
    /// element has been rendered (or skipped).
    pub fn frame_element(
        &mut self,
        tree: &mut UiTree,
        widget: impl Into<Widget>,
        setup: impl FnOnce(&mut ElementNode),
    ) -> ElementId {
        let mut node = ElementNode::new(widget);
        setup(&mut node);
        node.manager = Some(self.id);

        let id = tree.insert(node);
        self.immediates.push(Immediate { id, updated: false });
        id
    }

    /// Queue a one-shot draw callback ordered like an element with these keys
    pub fn draw_callback(
        &mut self,
        layer: i32,
        order: i32,
        callback: impl FnOnce(&mut RenderContext<'_>) + 'static,
    ) {
        self.callbacks.push(QueuedCallback {
            layer,
            order,
            callback: Box::new(callback),
        });
    }

    /// Update pass
    ///
    /// Immediate elements that were updated by an earlier pass but never
    /// rendered are discarded first. Then every root is updated, followed by
    /// each queued immediate element exactly once.
    pub fn update(
        &mut self,
        tree: &mut UiTree,
        frame: &mut FrameInput<'_>,
        measurer: &dyn TextMeasurer,
    ) {
        let (stale, fresh): (Vec<Immediate>, Vec<Immediate>) = std::mem::take(&mut self.immediates)
            .into_iter()
            .partition(|immediate| immediate.updated);
        for immediate in &stale {
            log::debug!("Discarding unrendered immediate element {:?}", immediate.id);
            tree.destroy(immediate.id);
        }
        self.immediates = fresh;

        for &root in &self.roots {
            tree.set_manager(root, Some(self.id));
        }

        {
            let mut ctx = UpdateContext {
                input: frame.input,
                clock: frame.clock,
                camera: frame.camera,
                config: frame.config,
                events: &mut *frame.events,
                measurer,
                manager: &*self,
            };

            for &root in &self.roots {
                widgets::update_element(tree, root, &mut ctx);
            }
            for immediate in &self.immediates {
                widgets::update_element(tree, immediate.id, &mut ctx);
            }
        }

        for immediate in &mut self.immediates {
            immediate.updated = true;
        }
    }

    /// Render pass
    ///
    /// Draws the visible roots, immediate elements and callbacks in canonical
    /// order. Immediate elements that missed the update pass are updated right
    /// before their own draw. Afterwards the single-frame queues are empty.
    pub fn render(
        &mut self,
        tree: &mut UiTree,
        frame: &mut FrameInput<'_>,
        backend: &mut dyn RenderBackend,
        draw_states: &mut DrawStateStack,
        target: RenderTargetId,
    ) {
        let queued = std::mem::take(&mut self.callbacks);
        let keys: Vec<(i32, i32)> = queued.iter().map(|c| (c.layer, c.order)).collect();
        let mut callbacks: Vec<Option<DrawCallback>> =
            queued.into_iter().map(|c| Some(c.callback)).collect();

        let items = self.render_items(tree, &keys);
        log::trace!("UiManager {:?} rendering {} items", self.id, items.len());

        {
            let this = &*self;
            for item in items {
                match item {
                    RenderItem::Element(id) => {
                        let needs_update = this
                            .immediates
                            .iter()
                            .any(|immediate| immediate.id == id && !immediate.updated);

                        if needs_update {
                            let measurer = BackendMeasurer(&*backend);
                            let mut ctx = UpdateContext {
                                input: frame.input,
                                clock: frame.clock,
                                camera: frame.camera,
                                config: frame.config,
                                events: &mut *frame.events,
                                measurer: &measurer,
                                manager: this,
                            };
                            widgets::update_element(tree, id, &mut ctx);
                        }

                        let mut ctx = RenderContext {
                            backend: &mut *backend,
                            draw_states: &mut *draw_states,
                            target,
                            camera: frame.camera,
                            clock: frame.clock,
                        };
                        widgets::render_element(tree, id, &mut ctx);
                    }
                    RenderItem::Callback(index) => {
                        if let Some(callback) = callbacks.get_mut(index).and_then(Option::take) {
                            let mut ctx = RenderContext {
                                backend: &mut *backend,
                                draw_states: &mut *draw_states,
                                target,
                                camera: frame.camera,
                                clock: frame.clock,
                            };
                            callback(&mut ctx);
                        }
                    }
                }
            }
        }

        for immediate in std::mem::take(&mut self.immediates) {
            tree.destroy(immediate.id);
        }
    }

    /// Top-most element under a screen-space point
    ///
    /// Walks the draw set in reverse paint order. Within each element the
    /// children are searched first (also in reverse paint order), so the
    /// deepest, most recently drawn match wins. Hidden subtrees are skipped.
    /// With `event_only`, elements that do not accept events are passed over
    /// but their ancestors are still considered.
    pub fn top_most_at(
        &self,
        tree: &UiTree,
        input: &InputSnapshot,
        camera: Option<&Camera2D>,
        screen: Vec2,
        event_only: bool,
    ) -> Option<ElementId> {
        if !input.pointer_in_frame() {
            return None;
        }

        let query = HitQuery {
            tree,
            camera,
            screen,
            event_only,
        };

        self.render_items(tree, &[])
            .into_iter()
            .rev()
            .find_map(|item| match item {
                RenderItem::Element(id) => query.search(id, Vec2::zeros(), None),
                RenderItem::Callback(_) => None,
            })
    }

    /// Canonical frame order: visible roots, then immediates, then callbacks,
    /// stably sorted by (layer, order)
    fn render_items(&self, tree: &UiTree, callback_keys: &[(i32, i32)]) -> Vec<RenderItem> {
        let elements = self
            .roots
            .iter()
            .copied()
            .chain(self.immediates.iter().map(|immediate| immediate.id))
            .filter(|&id| tree.is_visible(id))
            .map(|id| (tree.order_key(id), RenderItem::Element(id)));

        let callbacks = callback_keys
            .iter()
            .enumerate()
            .map(|(index, &key)| (key, RenderItem::Callback(index)));

        let mut items: Vec<((i32, i32), RenderItem)> = elements.chain(callbacks).collect();
        items.sort_by_key(|(key, _)| *key);
        items.into_iter().map(|(_, item)| item).collect()
    }
}

/// Recursive top-most search state
struct HitQuery<'a> {
    tree: &'a UiTree,
    camera: Option<&'a Camera2D>,
    screen: Vec2,
    event_only: bool,
}

impl HitQuery<'_> {
    /// Search the subtree rooted at `id`
    ///
    /// `shift` is the scroll offset applied by enclosing scroll views that are
    /// not currently shifting their children themselves, and `view` is the
    /// viewport those scroll views clip their content to.
    fn search(&self, id: ElementId, shift: Vec2, view: Option<Rect>) -> Option<ElementId> {
        let node = self.tree.get(id)?;
        if !node.visible_self() {
            return None;
        }

        let (child_shift, child_view) = match &node.widget {
            Widget::ScrollView(scroll) => {
                let viewport = self.tree.bounds_rect(id).offset(-shift);
                let viewport = view.map_or(viewport, |outer| outer.intersection(&viewport));
                let shift = if scroll.is_clip_scope_active() {
                    shift
                } else {
                    shift + scroll.offset()
                };
                (shift, Some(viewport))
            }
            _ => (shift, view),
        };

        for child in self.tree.ordered_children(id).into_iter().rev() {
            if let Some(hit) = self.search(child, child_shift, child_view) {
                return Some(hit);
            }
        }

        if self.event_only && !node.accepts_events() {
            return None;
        }

        let point = element_point(self.tree, self.camera, id, self.screen);
        let inside_view = view.map_or(true, |v| v.contains(point));
        let rect = self.tree.effective_clip_rect(id).offset(-shift);

        (inside_view && rect.contains(point)).then_some(id)
    }
}
