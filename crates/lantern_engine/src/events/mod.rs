//! UI event queue
//!
//! Widgets never call back into host code while the tree is borrowed. They
//! push a [`UiEvent`] instead and the host dispatches the queue after the
//! update pass.
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration per event kind (only notify interested handlers)
//! - Hosts that prefer polling call [`EventSystem::drain`]

use crate::foundation::math::Vec2;
use crate::ui::ElementId;
use std::collections::HashMap;

/// Event kind, used as the registration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// Element was clicked
    Clicked,
    /// Hover state changed
    HoverChanged,
    /// Scroll offset changed
    ScrollChanged,
    /// Editable text changed
    TextChanged,
    /// Keyboard focus changed
    FocusChanged,
    /// Widget wants the host clipboard set
    ClipboardSet,
}

/// Event emitted by a widget during update
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Element was clicked
    Clicked(ElementId),
    /// Hover state changed
    HoverChanged {
        /// Source element
        id: ElementId,
        /// New hover state
        hovered: bool,
    },
    /// Scroll offset changed
    ScrollChanged {
        /// Source element
        id: ElementId,
        /// New offset
        offset: Vec2,
    },
    /// Editable text changed
    TextChanged {
        /// Source element
        id: ElementId,
    },
    /// Keyboard focus changed
    FocusChanged {
        /// Source element
        id: ElementId,
        /// New focus state
        focused: bool,
    },
    /// Widget wants the host clipboard set to this text
    ClipboardSet(String),
}

impl UiEvent {
    /// Kind of this event
    pub fn kind(&self) -> UiEventKind {
        match self {
            Self::Clicked(_) => UiEventKind::Clicked,
            Self::HoverChanged { .. } => UiEventKind::HoverChanged,
            Self::ScrollChanged { .. } => UiEventKind::ScrollChanged,
            Self::TextChanged { .. } => UiEventKind::TextChanged,
            Self::FocusChanged { .. } => UiEventKind::FocusChanged,
            Self::ClipboardSet(_) => UiEventKind::ClipboardSet,
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &UiEvent) -> bool;
}

impl<F: FnMut(&UiEvent) -> bool> EventHandler for F {
    fn on_event(&mut self, event: &UiEvent) -> bool {
        self(event)
    }
}

/// Event system with registration and queuing
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<UiEvent>,
    handlers: HashMap<UiEventKind, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event kind
    pub fn register_handler(&mut self, kind: UiEventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event
    pub fn send(&mut self, event: UiEvent) {
        log::trace!("UI event queued: {:?}", event);
        self.queue.push(event);
    }

    /// Queued events, oldest first
    pub fn pending(&self) -> &[UiEvent] {
        &self.queue
    }

    /// Dispatch all pending events to registered handlers
    /// Stops on the first handler that returns true (consumed)
    pub fn dispatch(&mut self) {
        let queue = std::mem::take(&mut self.queue);
        for event in &queue {
            if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(event) {
                        break;
                    }
                }
            }
        }
    }

    /// Take all pending events without dispatching them
    pub fn drain(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.queue)
    }

    /// Clear all queued events (useful for scene transitions)
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_consuming_handler_stops_forwarding() {
        let mut system = EventSystem::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        system.register_handler(
            UiEventKind::ClipboardSet,
            Box::new(move |event: &UiEvent| {
                first.borrow_mut().push(("first", event.clone()));
                true
            }),
        );
        let second = Rc::clone(&seen);
        system.register_handler(
            UiEventKind::ClipboardSet,
            Box::new(move |event: &UiEvent| {
                second.borrow_mut().push(("second", event.clone()));
                false
            }),
        );

        system.send(UiEvent::ClipboardSet("abc".into()));
        system.dispatch();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0, "first");
        assert!(system.pending().is_empty());
    }

    #[test]
    fn test_drain_returns_in_order() {
        let mut system = EventSystem::new();
        system.send(UiEvent::ClipboardSet("a".into()));
        system.send(UiEvent::ClipboardSet("b".into()));

        let events = system.drain();
        assert_eq!(
            events,
            vec![UiEvent::ClipboardSet("a".into()), UiEvent::ClipboardSet("b".into())]
        );
        assert!(system.pending().is_empty());
    }
}
