//! UI widgets module
//!
//! The closed set of element behaviours. Every widget shares the same
//! two-operation contract (update, render); the tree node stores the
//! variant and [`update_element`]/[`render_element`] dispatch on it.

pub mod button;
pub mod input_field;
pub mod label;
pub mod layout;
pub mod panel;
pub mod scroll_view;

pub use button::{Button, ButtonState};
pub use input_field::InputField;
pub use label::Label;
pub use layout::{GridOverflow, LayoutContainer, LayoutKind};
pub use panel::Panel;
pub use scroll_view::{ContentSize, ScrollView};

use crate::foundation::math::Vec2;
use crate::ui::context::{RenderContext, UpdateContext};
use crate::ui::element::ElementId;
use crate::ui::tree::UiTree;

/// Element behaviour and its widget-specific state
#[derive(Debug, Clone)]
pub enum Widget {
    /// Background quad with children
    Panel(Panel),
    /// Static text
    Label(Label),
    /// Clickable button
    Button(Button),
    /// Single-line text editor
    InputField(InputField),
    /// Scrollable, clipped viewport over its children
    ScrollView(ScrollView),
    /// Vertical, horizontal or grid arrangement of its children
    Layout(LayoutContainer),
}

impl Widget {
    /// Size given to a freshly created element
    pub fn default_size(&self) -> Vec2 {
        match self {
            Self::Panel(_) => Vec2::new(100.0, 100.0),
            Self::Label(_) | Self::Layout(_) => Vec2::zeros(),
            Self::Button(_) | Self::InputField(_) => Vec2::new(120.0, 30.0),
            Self::ScrollView(_) => Vec2::new(200.0, 300.0),
        }
    }

    /// Whether a freshly created element accepts events
    pub fn accepts_events_by_default(&self) -> bool {
        !matches!(self, Self::Label(_) | Self::ScrollView(_) | Self::Layout(_))
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Panel(_) => "Panel",
            Self::Label(_) => "Label",
            Self::Button(_) => "Button",
            Self::InputField(_) => "InputField",
            Self::ScrollView(_) => "ScrollView",
            Self::Layout(_) => "Layout",
        }
    }
}

/// Typed access to one widget variant
pub trait WidgetVariant: Sized {
    /// Borrow the variant if `widget` holds it
    fn from_widget(widget: &Widget) -> Option<&Self>;

    /// Mutably borrow the variant if `widget` holds it
    fn from_widget_mut(widget: &mut Widget) -> Option<&mut Self>;
}

macro_rules! widget_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Widget {
                fn from(widget: $ty) -> Self {
                    Self::$variant(widget)
                }
            }

            impl WidgetVariant for $ty {
                fn from_widget(widget: &Widget) -> Option<&Self> {
                    match widget {
                        Widget::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_widget_mut(widget: &mut Widget) -> Option<&mut Self> {
                    match widget {
                        Widget::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

widget_variant! {
    Panel => Panel,
    Label => Label,
    Button => Button,
    InputField => InputField,
    ScrollView => ScrollView,
    Layout => LayoutContainer,
}

impl UiTree {
    /// Borrow a node's widget as a concrete variant
    pub fn widget_as<W: WidgetVariant>(&self, id: ElementId) -> Option<&W> {
        self.widget(id).and_then(W::from_widget)
    }

    /// Mutably borrow a node's widget as a concrete variant
    pub fn widget_as_mut<W: WidgetVariant>(&mut self, id: ElementId) -> Option<&mut W> {
        self.widget_mut(id).and_then(W::from_widget_mut)
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Panel,
    Label,
    Button,
    InputField,
    ScrollView,
    Layout,
}

fn kind_of(tree: &UiTree, id: ElementId) -> Option<Kind> {
    tree.widget(id).map(|widget| match widget {
        Widget::Panel(_) => Kind::Panel,
        Widget::Label(_) => Kind::Label,
        Widget::Button(_) => Kind::Button,
        Widget::InputField(_) => Kind::InputField,
        Widget::ScrollView(_) => Kind::ScrollView,
        Widget::Layout(_) => Kind::Layout,
    })
}

/// Run one element's update
pub fn update_element(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    match kind_of(tree, id) {
        Some(Kind::Panel) => panel::update(tree, id, ctx),
        Some(Kind::Label) => label::update(tree, id, ctx),
        Some(Kind::Button) => button::update(tree, id, ctx),
        Some(Kind::InputField) => input_field::update(tree, id, ctx),
        Some(Kind::ScrollView) => scroll_view::update(tree, id, ctx),
        Some(Kind::Layout) => layout::update(tree, id, ctx),
        None => log::warn!("update_element: stale element {:?}", id),
    }
}

/// Run one element's render
pub fn render_element(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    match kind_of(tree, id) {
        Some(Kind::Panel) => panel::render(tree, id, ctx),
        Some(Kind::Label) => label::render(tree, id, ctx),
        Some(Kind::Button) => button::render(tree, id, ctx),
        Some(Kind::InputField) => input_field::render(tree, id, ctx),
        Some(Kind::ScrollView) => scroll_view::render(tree, id, ctx),
        Some(Kind::Layout) => layout::render(tree, id, ctx),
        None => log::warn!("render_element: stale element {:?}", id),
    }
}

/// Update every child in insertion order
pub(crate) fn update_children(tree: &mut UiTree, id: ElementId, ctx: &mut UpdateContext<'_>) {
    for child in tree.children(id).to_vec() {
        update_element(tree, child, ctx);
    }
}

/// Render every visible child in paint order
pub(crate) fn render_children(tree: &mut UiTree, id: ElementId, ctx: &mut RenderContext<'_>) {
    for child in tree.ordered_children(id) {
        if tree.is_visible(child) {
            render_element(tree, child, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_access() {
        let mut tree = UiTree::new();
        let id = tree.create(Button::new("ok"));

        assert!(tree.widget_as::<Button>(id).is_some());
        assert!(tree.widget_as::<Panel>(id).is_none());

        tree.widget_as_mut::<Button>(id).unwrap().text = "changed".into();
        assert_eq!(tree.widget_as::<Button>(id).unwrap().text, "changed");
    }

    #[test]
    fn test_default_sizes() {
        let mut tree = UiTree::new();
        let scroll = tree.create(ScrollView::default());
        let button = tree.create(Button::new("b"));

        assert_eq!(tree.size(scroll), Vec2::new(200.0, 300.0));
        assert_eq!(tree.size(button), Vec2::new(120.0, 30.0));
        assert!(!tree.get(scroll).unwrap().accepts_events());
    }
}
