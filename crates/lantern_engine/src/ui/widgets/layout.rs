//! Layout containers
//!
//! A layout rewrites every child's local position (and, for grids, size)
//! each time it is updated or rendered. Nothing is cached. The container
//! itself never takes events and its own size is reset to zero after
//! arranging, so its footprint is whatever its children cover.

use super::{render_children, update_children};
use crate::foundation::math::Vec2;
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::tree::UiTree;

/// Fill order of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridOverflow {
    /// Fill a row, then wrap downward
    #[default]
    RowMajor,
    /// Fill a column, then wrap rightward
    ColumnMajor,
}

/// Arrangement strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutKind {
    /// Stack children top to bottom
    Vertical,
    /// Stack children left to right
    Horizontal,
    /// Place children into cells, each child taking the cell size
    Grid {
        /// Column count (clamped to at least one)
        columns: usize,
        /// Row count, derived from the child count when `None`
        rows: Option<usize>,
        /// Fixed cell size, derived from `area` when `None`
        cell_size: Option<Vec2>,
        /// Fill order
        overflow: GridOverflow,
    },
}

/// Container that positions its children
#[derive(Debug, Clone)]
pub struct LayoutContainer {
    /// Strategy
    pub kind: LayoutKind,

    /// Offset of the first child from the container's origin
    pub padding: Vec2,

    /// Gap between consecutive children
    pub spacing: Vec2,

    /// Area the grid divides into cells
    pub area: Vec2,
}

impl Default for LayoutContainer {
    fn default() -> Self {
        Self::vertical()
    }
}

impl LayoutContainer {
    fn with_kind(kind: LayoutKind) -> Self {
        Self {
            kind,
            padding: Vec2::zeros(),
            spacing: Vec2::zeros(),
            area: Vec2::zeros(),
        }
    }

    /// Vertical stack
    pub fn vertical() -> Self {
        Self::with_kind(LayoutKind::Vertical)
    }

    /// Horizontal stack
    pub fn horizontal() -> Self {
        Self::with_kind(LayoutKind::Horizontal)
    }

    /// Row-major grid with computed rows and cell size
    pub fn grid(columns: usize) -> Self {
        Self::with_kind(LayoutKind::Grid {
            columns,
            rows: None,
            cell_size: None,
            overflow: GridOverflow::RowMajor,
        })
    }

    /// Set the padding
    pub fn with_padding(mut self, x: f32, y: f32) -> Self {
        self.padding = Vec2::new(x, y);
        self
    }

    /// Set the spacing
    pub fn with_spacing(mut self, x: f32, y: f32) -> Self {
        self.spacing = Vec2::new(x, y);
        self
    }

    /// Set the grid area
    pub fn with_area(mut self, width: f32, height: f32) -> Self {
        self.area = Vec2::new(width, height);
        self
    }

    /// Reposition the children of `id` and collapse its own size
    pub fn arrange(&self, tree: &mut UiTree, id: ElementId) {
        let children = tree.children(id).to_vec();

        match self.kind {
            LayoutKind::Vertical => {
                let mut y = self.padding.y;
                for child in children {
                    tree.set_local_position(child, Vec2::new(self.padding.x, y));
                    y += tree.size(child).y + self.spacing.y;
                }
            }
            LayoutKind::Horizontal => {
                let mut x = self.padding.x;
                for child in children {
                    tree.set_local_position(child, Vec2::new(x, self.padding.y));
                    x += tree.size(child).x + self.spacing.x;
                }
            }
            LayoutKind::Grid {
                columns,
                rows,
                cell_size,
                overflow,
            } => {
                let columns = columns.max(1);
                let rows = rows
                    .unwrap_or_else(|| children.len().div_ceil(columns))
                    .max(1);
                let cell = cell_size.unwrap_or_else(|| self.computed_cell(columns, rows));

                for (i, child) in children.into_iter().enumerate() {
                    let (col, row) = match overflow {
                        GridOverflow::RowMajor => (i % columns, i / columns),
                        GridOverflow::ColumnMajor => (i / rows, i % rows),
                    };

                    let position = self.padding
                        + Vec2::new(
                            col as f32 * (cell.x + self.spacing.x),
                            row as f32 * (cell.y + self.spacing.y),
                        );
                    tree.set_local_position(child, position);
                    tree.set_size(child, cell);
                }
            }
        }

        tree.set_size(id, Vec2::zeros());
    }

    fn computed_cell(&self, columns: usize, rows: usize) -> Vec2 {
        let interior = self.area - self.padding * 2.0;
        let width = (interior.x - self.spacing.x * (columns - 1) as f32) / columns as f32;
        let height = (interior.y - self.spacing.y * (rows - 1) as f32) / rows as f32;
        Vec2::new(width.max(0.0), height.max(0.0))
    }
}

fn layout_of(tree: &UiTree, id: ElementId) -> Option<LayoutContainer> {
    tree.widget_as::<LayoutContainer>(id).cloned()
}

pub(crate) fn update(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    if let Some(node) = tree.get_mut(id) {
        node.set_accepts_events(false);
    }

    if let Some(layout) = layout_of(tree, id) {
        layout.arrange(tree, id);
    }
    update_children(tree, id, ctx);
}

pub(crate) fn render(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    if !tree.is_visible(id) {
        return;
    }

    if let Some(layout) = layout_of(tree, id) {
        layout.arrange(tree, id);
    }
    render_children(tree, id, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::element::ElementNode;
    use crate::ui::widgets::Panel;
    use approx::assert_relative_eq;

    fn with_children(layout: LayoutContainer, sizes: &[(f32, f32)]) -> (UiTree, ElementId, Vec<ElementId>) {
        let mut tree = UiTree::new();
        let container = tree.insert(ElementNode::new(layout).at(100.0, 50.0));
        let children = sizes
            .iter()
            .map(|&(w, h)| {
                let child = tree.insert(ElementNode::new(Panel::default()).sized(w, h));
                tree.add_child(container, child);
                child
            })
            .collect();
        (tree, container, children)
    }

    #[test]
    fn test_vertical_stacks_with_spacing() {
        let layout = LayoutContainer::vertical().with_padding(4.0, 2.0).with_spacing(0.0, 3.0);
        let (mut tree, container, children) =
            with_children(layout.clone(), &[(10.0, 20.0), (10.0, 5.0), (10.0, 1.0)]);

        layout.arrange(&mut tree, container);

        assert_eq!(tree.local_position(children[0]), Vec2::new(4.0, 2.0));
        assert_eq!(tree.local_position(children[1]), Vec2::new(4.0, 25.0));
        assert_eq!(tree.local_position(children[2]), Vec2::new(4.0, 33.0));
        assert_eq!(tree.position(children[2]), Vec2::new(104.0, 83.0));
        assert_eq!(tree.size(container), Vec2::zeros());
    }

    #[test]
    fn test_horizontal_stacks_with_spacing() {
        let layout = LayoutContainer::horizontal().with_spacing(2.0, 0.0);
        let (mut tree, container, children) = with_children(layout.clone(), &[(30.0, 5.0), (12.0, 5.0)]);

        layout.arrange(&mut tree, container);

        assert_eq!(tree.local_position(children[0]), Vec2::new(0.0, 0.0));
        assert_eq!(tree.local_position(children[1]), Vec2::new(32.0, 0.0));
    }

    #[test]
    fn test_grid_row_major_computed_cells() {
        let layout = LayoutContainer::grid(2)
            .with_padding(10.0, 10.0)
            .with_spacing(5.0, 5.0)
            .with_area(200.0, 300.0);
        let (mut tree, container, children) = with_children(layout.clone(), &[(1.0, 1.0); 5]);

        layout.arrange(&mut tree, container);

        assert_relative_eq!(tree.size(children[0]).x, 87.5);
        assert_relative_eq!(tree.size(children[0]).y, 90.0);
        assert_eq!(tree.local_position(children[3]), Vec2::new(102.5, 105.0));
        assert_eq!(tree.local_position(children[4]), Vec2::new(10.0, 200.0));
    }

    #[test]
    fn test_grid_column_major_fixed_cells() {
        let layout = LayoutContainer {
            kind: LayoutKind::Grid {
                columns: 0,
                rows: Some(2),
                cell_size: Some(Vec2::new(10.0, 10.0)),
                overflow: GridOverflow::ColumnMajor,
            },
            ..LayoutContainer::default()
        };
        let (mut tree, container, children) = with_children(layout.clone(), &[(1.0, 1.0); 3]);

        layout.arrange(&mut tree, container);

        assert_eq!(tree.local_position(children[1]), Vec2::new(0.0, 10.0));
        assert_eq!(tree.local_position(children[2]), Vec2::new(10.0, 0.0));
        assert_eq!(tree.size(children[2]), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_grid_without_children_is_noop() {
        let layout = LayoutContainer::grid(3).with_area(90.0, 90.0);
        let (mut tree, container, _) = with_children(layout.clone(), &[]);
        layout.arrange(&mut tree, container);
        assert!(tree.children(container).is_empty());
    }
}
