//! # Lantern Engine
//!
//! A retained-mode UI layer and render-state manager for 2D games.
//!
//! ## Features
//!
//! - **Element tree**: slot-map arena of widgets with layer/order sorting
//! - **Hit resolution**: top-most element under the pointer, scroll and clip aware
//! - **Draw-state stack**: nested batch states per render target
//! - **Widgets**: panels, labels, buttons, input fields, scroll views, layouts
//! - **Effects**: timed effects such as pop-in scaling and fades
//! - **Backend-agnostic**: draws through a narrow [`render::RenderBackend`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lantern_engine::prelude::*;
//!
//! #[derive(Default)]
//! struct Menu {
//!     state: SceneState,
//! }
//!
//! impl Scene for Menu {
//!     fn state(&self) -> &SceneState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut SceneState {
//!         &mut self.state
//!     }
//!
//!     fn load(&mut self, tree: &mut UiTree, _config: &EngineConfig) {
//!         let play = tree.insert(ElementNode::new(Button::new("Play")).at(20.0, 20.0).sized(120.0, 40.0));
//!         self.state.ui.add_element(tree, play);
//!     }
//! }
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn setup_scenes(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
//!         engine.add_scene(Menu::default(), true)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::with_application(EngineConfig::default(), &mut MyApp)?;
//!     let mut backend = RecordingBackend::new();
//!     let clock = FrameClock::fixed(1.0 / 60.0);
//!     let input = InputSnapshot::new();
//!
//!     engine.update(&input, &clock, &backend);
//!     engine.render(&mut backend, &input, &clock);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod effects;
pub mod events;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;
pub mod ui;

mod application;
mod engine;

pub use application::Application;
pub use engine::{client_bounds, Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        client_bounds,
        config::{Config, ConfigError, EngineConfig, UiConfig},
        effects::{Effect, EffectId, EffectManager, EffectTimer, FadeEffect, PopInEffect},
        events::{EventHandler, EventSystem, UiEvent, UiEventKind},
        foundation::{
            easing::Easing,
            math::{Rect, Vec2, Vec4},
            time::FrameClock,
        },
        input::{InputSnapshot, KeyCode, Modifiers, MouseButton},
        render::{
            color, Camera2D, DrawCommand, DrawState, DrawStateStack, FontHandle, RecordingBackend,
            RenderBackend, RenderTargetId, TextMeasurer, TextureHandle,
        },
        scene::{Scene, SceneContext, SceneState},
        ui::{
            Button, ContentSize, ElementId, ElementNode, InputField, Label, LayoutContainer,
            Panel, RenderContext, ScrollView, UiManager, UiTree,
        },
        Application, Engine, EngineError,
    };
}
