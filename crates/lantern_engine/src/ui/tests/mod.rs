//! Frame-level UI scenarios
//!
//! Each test drives whole update/render passes through a [`UiManager`]
//! against the recording backend.

mod widget_interaction;

use crate::config::UiConfig;
use crate::events::{EventSystem, UiEvent};
use crate::foundation::time::FrameClock;
use crate::input::InputSnapshot;
use crate::render::{DrawStateStack, RecordingBackend, RenderTargetId};
use crate::ui::{ElementId, ElementNode, FrameInput, UiManager, UiTree};

/// Tree, manager and everything a frame needs
pub(super) struct Frame {
    pub tree: UiTree,
    pub manager: UiManager,
    pub backend: RecordingBackend,
    pub draw_states: DrawStateStack,
    pub input: InputSnapshot,
    pub clock: FrameClock,
    pub config: UiConfig,
    pub events: EventSystem,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            tree: UiTree::new(),
            manager: UiManager::new(),
            backend: RecordingBackend::new(),
            draw_states: DrawStateStack::new(),
            input: InputSnapshot::new(),
            clock: FrameClock::fixed(1.0 / 60.0),
            config: UiConfig::default(),
            events: EventSystem::new(),
        }
    }

    /// Insert a node and register it as a root
    pub fn root(&mut self, node: ElementNode) -> ElementId {
        let id = self.tree.insert(node);
        self.manager.add_element(&mut self.tree, id);
        id
    }

    /// Insert a node under `parent`
    pub fn child(&mut self, parent: ElementId, node: ElementNode) -> ElementId {
        let id = self.tree.insert(node);
        self.tree.add_child(parent, id);
        id
    }

    pub fn update(&mut self) {
        let mut frame = FrameInput {
            input: &self.input,
            clock: &self.clock,
            camera: None,
            config: &self.config,
            events: &mut self.events,
        };
        self.manager.update(&mut self.tree, &mut frame, &self.backend);
    }

    pub fn render(&mut self) {
        let mut frame = FrameInput {
            input: &self.input,
            clock: &self.clock,
            camera: None,
            config: &self.config,
            events: &mut self.events,
        };
        self.manager.render(
            &mut self.tree,
            &mut frame,
            &mut self.backend,
            &mut self.draw_states,
            RenderTargetId::SCREEN,
        );
    }

    /// Run one update with `input` and return the events it produced
    pub fn step(&mut self, input: InputSnapshot) -> Vec<UiEvent> {
        self.input = input;
        self.update();
        self.events.drain()
    }
}
