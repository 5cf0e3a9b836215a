//! Scenes
//!
//! A scene owns the UI manager, the running effects and the optional camera
//! for one screen of the application. The [`Engine`](crate::engine::Engine)
//! keeps a list of scenes and drives exactly one of them each frame.
//!
//! ## Frame order
//!
//! ```text
//! update:  Scene::update -> EffectManager::update -> UiManager::update
//! render:  [scene draw state] Scene::render -> EffectManager::apply
//!          [point clamp]      Scene::ui_render -> UiManager::render -> Scene::render_ui
//! ```

use crate::config::EngineConfig;
use crate::effects::EffectManager;
use crate::events::EventSystem;
use crate::foundation::time::FrameClock;
use crate::input::InputSnapshot;
use crate::render::{Camera2D, DrawState};
use crate::ui::{RenderContext, UiManager, UiTree};

/// Engine-owned state every scene carries
#[derive(Debug)]
pub struct SceneState {
    /// UI manager holding the scene's root elements
    pub ui: UiManager,

    /// Effects started by the scene
    pub effects: EffectManager,

    /// Camera for world-space content
    pub camera: Option<Camera2D>,

    /// State the world pass is drawn with when `auto_draw` is set
    pub draw_state: DrawState,

    /// Let the engine open and close the world batch around [`Scene::render`]
    pub auto_draw: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            ui: UiManager::new(),
            effects: EffectManager::new(),
            camera: None,
            draw_state: DrawState::point_clamp(),
            auto_draw: true,
        }
    }
}

impl SceneState {
    /// Create the default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a camera covering the virtual surface
    pub fn setup_camera(&mut self, config: &EngineConfig) -> &mut Camera2D {
        self.camera.insert(Camera2D::new(
            config.virtual_width as f32,
            config.virtual_height as f32,
        ))
    }

    /// Draw state for the world pass
    ///
    /// A camera's view matrix replaces the transform of `draw_state`.
    pub fn world_draw_state(&self) -> DrawState {
        let transform = self
            .camera
            .as_ref()
            .map(Camera2D::view_matrix)
            .or(self.draw_state.transform);
        self.draw_state.with_transform(transform)
    }

    /// Release the manager's roots and destroy their subtrees
    pub fn clear_ui(&mut self, tree: &mut UiTree) {
        let roots = self.ui.roots().to_vec();
        self.ui.clear();
        for root in roots {
            tree.destroy(root);
        }
    }
}

/// Inputs available to [`Scene::update`]
pub struct SceneContext<'a> {
    /// Element tree shared by every scene
    pub tree: &'a mut UiTree,
    /// Input snapshot
    pub input: &'a InputSnapshot,
    /// Frame clock
    pub clock: &'a FrameClock,
    /// Event queue
    pub events: &'a mut EventSystem,
}

/// Host-implemented screen of the application
///
/// Only [`Scene::state`] and [`Scene::state_mut`] are required; every hook
/// defaults to doing nothing.
pub trait Scene {
    /// Engine-owned state
    fn state(&self) -> &SceneState;

    /// Mutable engine-owned state
    fn state_mut(&mut self) -> &mut SceneState;

    /// Called before [`Scene::load`] whenever the scene becomes active
    fn reset(&mut self, tree: &mut UiTree) {
        self.state_mut().clear_ui(tree);
    }

    /// Build the scene's elements
    fn load(&mut self, _tree: &mut UiTree, _config: &EngineConfig) {}

    /// Called when another scene replaces this one
    fn unload(&mut self, _tree: &mut UiTree) {}

    /// Per-frame logic, before effects and UI are updated
    fn update(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Draw world content
    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    /// Called before the UI manager renders
    fn ui_render(&mut self, _tree: &mut UiTree, _ctx: &mut RenderContext<'_>) {}

    /// Called after the UI manager renders
    fn render_ui(&mut self, _ctx: &mut RenderContext<'_>) {}
}
