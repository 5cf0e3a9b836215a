//! UI System Module
//!
//! Retained-mode element tree drawn over the scene.
//!
//! Architecture:
//! - tree/element: arena of nodes with parent/child links and geometry
//! - manager: root set, single-frame elements, draw callbacks, hit queries
//! - hit_test: pointer predicates used by interactive widgets
//! - widgets/: the closed set of element behaviours
//! - context: per-frame state handed to update and render

pub mod context;
pub mod element;
pub mod manager;
pub mod tree;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use context::{FrameInput, RenderContext, UpdateContext};
pub use element::{ElementFlags, ElementId, ElementNode, ManagerId};
pub use hit_test::HitScope;
pub use manager::{DrawCallback, UiManager};
pub use tree::UiTree;
pub use widgets::{
    Button, ButtonState, ContentSize, GridOverflow, InputField, Label, LayoutContainer, LayoutKind,
    Panel, ScrollView, Widget, WidgetVariant,
};
