//! Element arena
//!
//! Parent to children is the owning direction; the parent and manager
//! references stored on each node are plain handles used for traversal.

use crate::foundation::math::{Rect, Vec2};
use crate::ui::element::{ElementId, ElementNode, ManagerId};
use crate::ui::widgets::Widget;
use slotmap::SlotMap;

/// Arena holding every UI element
#[derive(Debug, Default)]
pub struct UiTree {
    nodes: SlotMap<ElementId, ElementNode>,
}

impl UiTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached node
    pub fn insert(&mut self, node: ElementNode) -> ElementId {
        self.nodes.insert(node)
    }

    /// Insert a detached node for a widget with default geometry
    pub fn create(&mut self, widget: impl Into<Widget>) -> ElementId {
        self.insert(ElementNode::new(widget))
    }

    /// Node lookup
    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    /// Mutable node lookup
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(id)
    }

    /// True if the handle refers to a live node
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes are alive
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Widget of a node
    pub fn widget(&self, id: ElementId) -> Option<&Widget> {
        self.nodes.get(id).map(|node| &node.widget)
    }

    /// Mutable widget of a node
    pub fn widget_mut(&mut self, id: ElementId) -> Option<&mut Widget> {
        self.nodes.get_mut(id).map(|node| &mut node.widget)
    }

    /// Attach `child` under `parent`
    ///
    /// A child attached elsewhere is detached from its old parent first.
    /// Re-adding an existing child is a no-op. The child takes the parent's
    /// manager reference, which may be none.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            log::warn!("add_child ignored: invalid pair {:?} <- {:?}", parent, child);
            return;
        }
        if self.is_child_of(parent, child) {
            log::warn!("add_child ignored: {:?} is an ancestor of {:?}", child, parent);
            return;
        }

        let old_parent = self.nodes[child].parent;
        if let Some(old) = old_parent.filter(|&old| old != parent) {
            self.remove_child(old, child);
        }

        let manager = self.nodes[parent].manager;
        let node = &mut self.nodes[child];
        node.manager = manager;
        node.parent = Some(parent);

        let siblings = &mut self.nodes[parent].children;
        if !siblings.contains(&child) {
            siblings.push(child);
        }
    }

    /// Detach `child` from `parent`, clearing its manager reference
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return;
        };

        let was_child = parent_node.children.contains(&child);
        parent_node.children.retain(|&c| c != child);

        if let Some(child_node) = self.nodes.get_mut(child) {
            if was_child {
                child_node.manager = None;
            }
            if child_node.parent == Some(parent) {
                child_node.parent = None;
            }
        }
    }

    /// Detach every child of `parent`
    pub fn clear_children(&mut self, parent: ElementId) {
        let children = self.children(parent).to_vec();
        for child in children.into_iter().rev() {
            self.remove_child(parent, child);
        }
    }

    /// Remove a node and its whole subtree from the arena
    pub fn destroy(&mut self, id: ElementId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }

        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            self.nodes.remove(node);
        }
    }

    /// Parent of a node
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of a node in insertion order
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Global position: parent's global position plus the local offset
    pub fn position(&self, id: ElementId) -> Vec2 {
        let mut position = Vec2::zeros();
        let mut current = Some(id);

        while let Some(node) = current.and_then(|c| self.nodes.get(c)) {
            position += node.local_position;
            current = node.parent;
        }

        position
    }

    /// Set the global position by storing the matching local offset
    pub fn set_position(&mut self, id: ElementId, position: Vec2) {
        let origin = self.parent(id).map_or_else(Vec2::zeros, |p| self.position(p));
        if let Some(node) = self.nodes.get_mut(id) {
            node.local_position = position - origin;
        }
    }

    /// Local offset from the parent
    pub fn local_position(&self, id: ElementId) -> Vec2 {
        self.nodes.get(id).map_or_else(Vec2::zeros, |node| node.local_position)
    }

    /// Set the local offset from the parent
    pub fn set_local_position(&mut self, id: ElementId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.local_position = position;
        }
    }

    /// Size of a node
    pub fn size(&self, id: ElementId) -> Vec2 {
        self.nodes.get(id).map_or_else(Vec2::zeros, |node| node.size)
    }

    /// Set the size of a node
    pub fn set_size(&mut self, id: ElementId, size: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.size = size;
        }
    }

    /// Global bounds rectangle
    pub fn bounds_rect(&self, id: ElementId) -> Rect {
        Rect::from_pos_size(self.position(id), self.size(id))
    }

    /// Explicit clip rectangle if set, else the bounds
    pub fn effective_clip_rect(&self, id: ElementId) -> Rect {
        match self.nodes.get(id).and_then(|node| node.clip_rect) {
            Some(clip) => clip,
            None => self.bounds_rect(id),
        }
    }

    /// Visible: own flag and every ancestor's own flag are set
    pub fn is_visible(&self, id: ElementId) -> bool {
        let mut current = Some(id);

        while let Some(c) = current {
            match self.nodes.get(c) {
                Some(node) if node.visible_self() => current = node.parent,
                _ => return false,
            }
        }

        true
    }

    /// Enabled flag of a node
    pub fn is_enabled(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(ElementNode::enabled)
    }

    /// True if `ancestor` appears on the parent chain of `id`
    pub fn is_child_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.parent(id);

        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }

        false
    }

    /// True if `descendant` is somewhere below `id`
    pub fn is_parent_of(&self, id: ElementId, descendant: ElementId) -> bool {
        self.is_child_of(descendant, id)
    }

    /// Full subtree below `id` in document order, excluding `id`
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: ElementId, out: &mut Vec<ElementId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Union of the bounds of `id` and every descendant
    pub fn subtree_bounds(&self, id: ElementId) -> Rect {
        self.descendants(id)
            .into_iter()
            .fold(self.bounds_rect(id), |acc, d| acc.union(&self.bounds_rect(d)))
    }

    /// Union of the subtree bounds of every child, `None` without children
    pub fn children_bounds(&self, id: ElementId) -> Option<Rect> {
        self.children(id)
            .iter()
            .map(|&child| self.subtree_bounds(child))
            .reduce(|acc, r| acc.union(&r))
    }

    /// Manager explicitly set on the node
    pub fn manager(&self, id: ElementId) -> Option<ManagerId> {
        self.nodes.get(id).and_then(|node| node.manager)
    }

    /// Set the manager reference of a node
    pub fn set_manager(&mut self, id: ElementId, manager: Option<ManagerId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.manager = manager;
        }
    }

    /// Manager a node answers to
    ///
    /// The node's own reference wins. Without one, and with auto-fallback
    /// enabled, the nearest ancestor with a reference is used, then
    /// `fallback` (the active scene's manager).
    pub fn effective_manager(&self, id: ElementId, fallback: Option<ManagerId>) -> Option<ManagerId> {
        let node = self.nodes.get(id)?;
        if node.manager.is_some() || !node.auto_fallback_manager() {
            return node.manager;
        }

        let mut current = node.parent;
        while let Some(c) = current {
            let ancestor = self.nodes.get(c)?;
            if ancestor.manager.is_some() {
                return ancestor.manager;
            }
            current = ancestor.parent;
        }

        fallback
    }

    /// Children sorted by (layer, order, insertion index)
    pub fn ordered_children(&self, id: ElementId) -> Vec<ElementId> {
        let mut children = self.children(id).to_vec();
        children.sort_by_key(|&c| self.order_key(c));
        children
    }

    /// Layer and order keys of a node
    pub fn order_key(&self, id: ElementId) -> (i32, i32) {
        self.nodes
            .get(id)
            .map_or((0, 0), |node| (node.render_layer, node.render_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::widgets::Panel;

    fn panel(tree: &mut UiTree, x: f32, y: f32) -> ElementId {
        tree.insert(ElementNode::new(Panel::default()).at(x, y))
    }

    #[test]
    fn test_position_set_get_roundtrip() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 10.0, 20.0);
        let child = panel(&mut tree, 0.0, 0.0);
        tree.add_child(root, child);

        tree.set_position(child, Vec2::new(50.0, 60.0));
        assert_eq!(tree.position(child), Vec2::new(50.0, 60.0));
        assert_eq!(tree.local_position(child), Vec2::new(40.0, 40.0));

        tree.set_position(root, Vec2::new(0.0, 0.0));
        assert_eq!(tree.local_position(child), Vec2::new(40.0, 40.0));
        assert_eq!(tree.position(child), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_position_without_parent() {
        let mut tree = UiTree::new();
        let lone = panel(&mut tree, 3.0, 4.0);
        tree.set_position(lone, Vec2::new(7.0, 8.0));
        assert_eq!(tree.local_position(lone), Vec2::new(7.0, 8.0));
    }

    #[test]
    fn test_reparent_detaches_first() {
        let mut tree = UiTree::new();
        let a = panel(&mut tree, 0.0, 0.0);
        let b = panel(&mut tree, 0.0, 0.0);
        let c = panel(&mut tree, 0.0, 0.0);

        tree.add_child(a, c);
        tree.add_child(a, c);
        assert_eq!(tree.children(a), &[c]);

        tree.add_child(b, c);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = UiTree::new();
        let a = panel(&mut tree, 0.0, 0.0);
        let b = panel(&mut tree, 0.0, 0.0);
        tree.add_child(a, b);
        tree.add_child(b, a);

        assert_eq!(tree.parent(a), None);
        assert!(tree.is_parent_of(a, b));
        assert!(!tree.is_child_of(a, b));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let a = panel(&mut tree, 0.0, 0.0);
        let a1 = panel(&mut tree, 0.0, 0.0);
        let a2 = panel(&mut tree, 0.0, 0.0);
        let b = panel(&mut tree, 0.0, 0.0);
        tree.add_child(root, a);
        tree.add_child(a, a1);
        tree.add_child(a, a2);
        tree.add_child(root, b);

        let all = tree.descendants(root);
        assert_eq!(all, vec![a, a1, a2, b]);
        assert!(!all.contains(&root));
    }

    #[test]
    fn test_visibility_is_monotonic() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let mid = panel(&mut tree, 0.0, 0.0);
        let leaf = panel(&mut tree, 0.0, 0.0);
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);

        tree.get_mut(root).unwrap().set_visible_self(false);
        assert!(!tree.is_visible(mid));
        assert!(!tree.is_visible(leaf));
        assert!(tree.get(leaf).unwrap().visible_self());
    }

    #[test]
    fn test_effective_manager_fallback() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let child = panel(&mut tree, 0.0, 0.0);
        tree.add_child(root, child);

        let owner = ManagerId::next();
        let active = ManagerId::next();
        assert_eq!(tree.effective_manager(child, Some(active)), Some(active));

        tree.set_manager(root, Some(owner));
        assert_eq!(tree.effective_manager(child, Some(active)), Some(owner));

        tree.get_mut(child).unwrap().flags.remove(crate::ui::ElementFlags::AUTO_FALLBACK_MANAGER);
        assert_eq!(tree.effective_manager(child, Some(active)), None);
    }

    #[test]
    fn test_remove_child_clears_manager() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let child = panel(&mut tree, 0.0, 0.0);
        let owner = ManagerId::next();
        tree.set_manager(root, Some(owner));
        tree.add_child(root, child);
        assert_eq!(tree.manager(child), Some(owner));

        tree.remove_child(root, child);
        assert_eq!(tree.manager(child), None);
        assert_eq!(tree.parent(child), None);
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let child = panel(&mut tree, 0.0, 0.0);
        let grandchild = panel(&mut tree, 0.0, 0.0);
        tree.add_child(root, child);
        tree.add_child(child, grandchild);

        tree.destroy(child);
        assert!(tree.contains(root));
        assert!(!tree.contains(child));
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_subtree_bounds_union() {
        let mut tree = UiTree::new();
        let root = tree.insert(ElementNode::new(Panel::default()).at(0.0, 0.0).sized(10.0, 10.0));
        let child = tree.insert(ElementNode::new(Panel::default()).at(50.0, 5.0).sized(10.0, 100.0));
        tree.add_child(root, child);

        assert_eq!(tree.subtree_bounds(root), Rect::new(0.0, 0.0, 60.0, 105.0));
        assert_eq!(tree.children_bounds(root), Some(Rect::new(50.0, 5.0, 10.0, 100.0)));
        assert_eq!(tree.children_bounds(child), None);
    }

    #[test]
    fn test_ordered_children_stable() {
        let mut tree = UiTree::new();
        let root = panel(&mut tree, 0.0, 0.0);
        let a = tree.insert(ElementNode::new(Panel::default()).ordered(1, 0));
        let b = tree.insert(ElementNode::new(Panel::default()).ordered(0, 5));
        let c = tree.insert(ElementNode::new(Panel::default()).ordered(0, 5));
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(root, c);

        assert_eq!(tree.ordered_children(root), vec![b, c, a]);
    }
}
