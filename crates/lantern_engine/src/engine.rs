//! Core engine implementation

use crate::{
    application::Application,
    config::{Config, ConfigError, EngineConfig},
    events::EventSystem,
    foundation::{
        math::{Rect, Vec2},
        time::FrameClock,
    },
    input::InputSnapshot,
    render::{
        color, DrawState, DrawStateStack, RenderBackend, RenderTargetId, SamplerMode,
        TextMeasurer,
    },
    scene::{Scene, SceneContext, SceneState},
    ui::{FrameInput, RenderContext, UiTree},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the element tree and the scene list and drives the
/// active scene through one update and one render pass per frame. The host
/// supplies input, clock and backend each frame.
pub struct Engine {
    /// Element tree shared by every scene
    tree: UiTree,

    /// Registered scenes
    scenes: Vec<Box<dyn Scene>>,

    /// Index of the active scene
    active: Option<usize>,

    /// Draw-state stacks for every render target
    draw_states: DrawStateStack,

    /// Event queue filled by widgets
    events: EventSystem,

    /// Engine configuration
    config: EngineConfig,

    /// Size of the presentation back buffer
    back_buffer: Vec2,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scenes", &self.scenes.len())
            .field("active", &self.active)
            .field("elements", &self.tree.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Self {
        log::info!(
            "Initializing engine '{}' ({}x{})",
            config.title,
            config.virtual_width,
            config.virtual_height
        );

        let back_buffer = virtual_size(&config);
        Self {
            tree: UiTree::new(),
            scenes: Vec::new(),
            active: None,
            draw_states: DrawStateStack::new(),
            events: EventSystem::new(),
            config,
            back_buffer,
        }
    }

    /// Create an engine from a TOML or RON configuration file
    pub fn from_config_file(path: &str) -> Result<Self, EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        Ok(Self::new(config))
    }

    /// Create an engine and let the application register its scenes
    pub fn with_application<A: Application>(
        config: EngineConfig,
        app: &mut A,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(config);
        app.setup_scenes(&mut engine)?;
        log::info!("Application registered {} scenes", engine.scenes.len());
        Ok(engine)
    }

    /// Register a scene and return its index
    ///
    /// With `make_active` the scene is loaded immediately.
    pub fn add_scene(
        &mut self,
        scene: impl Scene + 'static,
        make_active: bool,
    ) -> Result<usize, EngineError> {
        self.scenes.push(Box::new(scene));
        let index = self.scenes.len() - 1;
        log::debug!("Scene {} added", index);

        if make_active {
            self.load_scene(index)?;
        }
        Ok(index)
    }

    /// Switch to the scene at `index`
    ///
    /// The previous scene is unloaded, then the new one is reset and loaded.
    #[must_use = "an out-of-range scene index must be handled"]
    pub fn load_scene(&mut self, index: usize) -> Result<(), EngineError> {
        let count = self.scenes.len();
        if index >= count {
            log::warn!("Scene index {} out of range ({} scenes)", index, count);
            return Err(EngineError::SceneIndexOutOfRange { index, count });
        }

        if let Some(previous) = self.active.and_then(|i| self.scenes.get_mut(i)) {
            log::info!("Unloading scene {:?}", self.active);
            previous.unload(&mut self.tree);
        }

        self.active = Some(index);
        let scene = self
            .scenes
            .get_mut(index)
            .ok_or(EngineError::SceneIndexOutOfRange { index, count })?;

        log::info!("Loading scene {}", index);
        scene.reset(&mut self.tree);
        scene.load(&mut self.tree, &self.config);
        Ok(())
    }

    /// Reset and load the active scene again
    pub fn reload_scene(&mut self) -> Result<(), EngineError> {
        let index = self.active.ok_or(EngineError::NoActiveScene)?;
        self.load_scene(index)
    }

    /// Update pass: scene logic, then effects, then the UI
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        clock: &FrameClock,
        measurer: &dyn TextMeasurer,
    ) {
        let Some(scene) = self.active.and_then(|i| self.scenes.get_mut(i)) else {
            return;
        };

        let mut ctx = SceneContext {
            tree: &mut self.tree,
            input,
            clock,
            events: &mut self.events,
        };
        scene.update(&mut ctx);

        let SceneState {
            ui,
            effects,
            camera,
            ..
        } = scene.state_mut();
        effects.update(clock);

        let mut frame = FrameInput {
            input,
            clock,
            camera: camera.as_ref(),
            config: &self.config.ui,
            events: &mut self.events,
        };
        ui.update(&mut self.tree, &mut frame, measurer);
    }

    /// Render pass
    ///
    /// The scene and its UI are drawn into the virtual surface
    /// ([`RenderTargetId::WORLD`]), which is then composited onto the back
    /// buffer inside [`Engine::client_bounds`]. Without an active scene the
    /// back buffer is cleared to black.
    pub fn render(&mut self, backend: &mut dyn RenderBackend, input: &InputSnapshot, clock: &FrameClock) {
        let Some(scene) = self.active.and_then(|i| self.scenes.get_mut(i)) else {
            backend.set_render_target(None);
            backend.clear(color::black());
            return;
        };

        let target = RenderTargetId::WORLD;
        backend.set_render_target(Some(target));

        let auto_draw = scene.state().auto_draw;
        if auto_draw {
            let state = scene.state().world_draw_state();
            self.draw_states.begin(backend, target, state);
        }

        let camera = scene.state().camera.clone();
        {
            let mut ctx = RenderContext {
                backend: &mut *backend,
                draw_states: &mut self.draw_states,
                target,
                camera: camera.as_ref(),
                clock,
            };
            scene.render(&mut ctx);
        }
        scene.state_mut().effects.apply(backend);

        if auto_draw {
            self.draw_states.end(backend, target);
        }

        self.draw_states.begin(backend, target, DrawState::point_clamp());
        {
            let mut ctx = RenderContext {
                backend: &mut *backend,
                draw_states: &mut self.draw_states,
                target,
                camera: camera.as_ref(),
                clock,
            };
            scene.ui_render(&mut self.tree, &mut ctx);
        }
        {
            let mut frame = FrameInput {
                input,
                clock,
                camera: camera.as_ref(),
                config: &self.config.ui,
                events: &mut self.events,
            };
            scene.state_mut().ui.render(
                &mut self.tree,
                &mut frame,
                backend,
                &mut self.draw_states,
                target,
            );
        }
        {
            let mut ctx = RenderContext {
                backend: &mut *backend,
                draw_states: &mut self.draw_states,
                target,
                camera: camera.as_ref(),
                clock,
            };
            scene.render_ui(&mut ctx);
        }
        self.draw_states.end(backend, target);

        backend.set_render_target(None);
        backend.clear(color::black());

        let screen = RenderTargetId::SCREEN;
        self.draw_states.begin(
            backend,
            screen,
            DrawState::point_clamp().with_sampler(SamplerMode::LinearClamp),
        );
        backend.present(target, self.client_bounds());
        self.draw_states.end(backend, screen);
    }

    /// Set the size of the presentation back buffer
    pub fn set_back_buffer_size(&mut self, width: f32, height: f32) {
        self.back_buffer = Vec2::new(width, height);
    }

    /// Rectangle of the back buffer the virtual surface is presented into
    pub fn client_bounds(&self) -> Rect {
        client_bounds(self.back_buffer, virtual_size(&self.config))
    }

    /// Map a back-buffer position to virtual surface coordinates
    pub fn window_to_virtual(&self, position: Vec2) -> Vec2 {
        let bounds = self.client_bounds();
        if bounds.is_empty() {
            return Vec2::zeros();
        }

        let scale = virtual_size(&self.config).component_div(&bounds.size());
        (position - bounds.position()).component_mul(&scale)
    }

    /// Index of the active scene
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&dyn Scene> {
        self.active
            .and_then(|i| self.scenes.get(i))
            .map(|scene| scene.as_ref())
    }

    /// The active scene, mutably
    pub fn active_scene_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        self.active
            .and_then(|i| self.scenes.get_mut(i))
            .map(|scene| scene.as_mut())
    }

    /// Number of registered scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Element tree
    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    /// Element tree, mutably
    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    /// Event queue
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Draw-state stacks
    pub fn draw_states(&self) -> &DrawStateStack {
        &self.draw_states
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn virtual_size(config: &EngineConfig) -> Vec2 {
    Vec2::new(config.virtual_width as f32, config.virtual_height as f32)
}

/// Largest rectangle of `virtual_size`'s aspect ratio centred in `back_buffer`
///
/// Wider back buffers are pillarboxed, taller ones letterboxed. Sizes and
/// offsets are whole pixels.
pub fn client_bounds(back_buffer: Vec2, virtual_size: Vec2) -> Rect {
    if back_buffer.x <= 0.0 || back_buffer.y <= 0.0 || virtual_size.x <= 0.0 || virtual_size.y <= 0.0 {
        return Rect::EMPTY;
    }

    let target_aspect = virtual_size.x / virtual_size.y;
    let window_aspect = back_buffer.x / back_buffer.y;

    let (width, height) = if window_aspect > target_aspect {
        (back_buffer.y * target_aspect, back_buffer.y)
    } else {
        (back_buffer.x, back_buffer.x / target_aspect)
    };
    let (width, height) = (width.floor(), height.floor());

    Rect::new(
        ((back_buffer.x - width) / 2.0).floor(),
        ((back_buffer.y - height) / 2.0).floor(),
        width,
        height,
    )
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// `load_scene` called with an index past the scene list
    #[error("Scene index {index} out of range ({count} scenes)")]
    SceneIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Registered scene count
        count: usize,
    },

    /// Operation needs an active scene
    #[error("No active scene")]
    NoActiveScene,

    /// Configuration failed to load
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use crate::input::MouseButton;
    use crate::render::{DrawCommand, RecordingBackend};
    use crate::ui::{Button, ElementNode};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct TestScene {
        name: &'static str,
        log: Log,
        state: SceneState,
    }

    impl TestScene {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                state: SceneState::new(),
            }
        }

        fn record(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}:{}", hook, self.name));
        }
    }

    impl Scene for TestScene {
        fn state(&self) -> &SceneState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut SceneState {
            &mut self.state
        }

        fn reset(&mut self, tree: &mut UiTree) {
            self.record("reset");
            self.state.clear_ui(tree);
        }

        fn load(&mut self, tree: &mut UiTree, _config: &EngineConfig) {
            self.record("load");
            let button = tree.insert(ElementNode::new(Button::new("go")).sized(100.0, 40.0));
            self.state.ui.add_element(tree, button);
        }

        fn unload(&mut self, _tree: &mut UiTree) {
            self.record("unload");
        }

        fn update(&mut self, _ctx: &mut SceneContext<'_>) {
            self.record("update");
        }

        fn render(&mut self, ctx: &mut RenderContext<'_>) {
            self.record("render");
            ctx.backend.draw_quad(None, Rect::new(0.0, 0.0, 1.0, 1.0), Vec4::zeros());
        }

        fn ui_render(&mut self, _tree: &mut UiTree, _ctx: &mut RenderContext<'_>) {
            self.record("ui_render");
        }

        fn render_ui(&mut self, _ctx: &mut RenderContext<'_>) {
            self.record("render_ui");
        }
    }

    struct TwoScenes(Log);

    impl Application for TwoScenes {
        fn setup_scenes(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
            engine.add_scene(TestScene::new("menu", &self.0), true)?;
            engine.add_scene(TestScene::new("game", &self.0), false)?;
            Ok(())
        }
    }

    fn engine_with_scenes(log: &Log) -> Engine {
        Engine::with_application(EngineConfig::default(), &mut TwoScenes(Rc::clone(log))).unwrap()
    }

    #[test]
    fn test_scene_switch_order() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        assert_eq!(engine.active_index(), Some(0));

        engine.load_scene(1).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["reset:menu", "load:menu", "unload:menu", "reset:game", "load:game"]
        );
        assert_eq!(engine.active_index(), Some(1));
    }

    #[test]
    fn test_load_scene_out_of_range() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);

        let result = engine.load_scene(5);

        assert!(matches!(
            result,
            Err(EngineError::SceneIndexOutOfRange { index: 5, count: 2 })
        ));
        assert_eq!(engine.active_index(), Some(0));
    }

    #[test]
    fn test_reload_without_scene() {
        let mut engine = Engine::new(EngineConfig::default());
        assert!(matches!(engine.reload_scene(), Err(EngineError::NoActiveScene)));
    }

    #[test]
    fn test_reload_replaces_elements() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        assert_eq!(engine.tree().len(), 1);

        engine.reload_scene().unwrap();

        assert_eq!(engine.tree().len(), 1);
        assert_eq!(engine.active_scene().unwrap().state().ui.roots().len(), 1);
    }

    #[test]
    fn test_render_without_scene_clears_black() {
        let mut engine = Engine::new(EngineConfig::default());
        let mut backend = RecordingBackend::new();

        engine.render(&mut backend, &InputSnapshot::new(), &FrameClock::fixed(1.0 / 60.0));

        assert_eq!(
            backend.commands(),
            &[DrawCommand::SetRenderTarget(None), DrawCommand::Clear(color::black())]
        );
    }

    #[test]
    fn test_frame_order() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        let mut backend = RecordingBackend::new();
        let input = InputSnapshot::new();
        let clock = FrameClock::fixed(1.0 / 60.0);
        log.borrow_mut().clear();

        engine.update(&input, &clock, &backend);
        engine.render(&mut backend, &input, &clock);

        assert_eq!(
            *log.borrow(),
            vec!["update:menu", "render:menu", "ui_render:menu", "render_ui:menu"]
        );

        let commands = backend.commands();
        assert_eq!(commands[0], DrawCommand::SetRenderTarget(Some(RenderTargetId::WORLD)));
        assert_eq!(commands[1], DrawCommand::BeginBatch(DrawState::point_clamp()));
        assert!(matches!(commands[2], DrawCommand::Quad { .. }));
        assert_eq!(commands[3], DrawCommand::EndBatch);
        assert_eq!(commands[4], DrawCommand::BeginBatch(DrawState::point_clamp()));

        let tail = &commands[commands.len() - 5..];
        assert_eq!(tail[0], DrawCommand::SetRenderTarget(None));
        assert_eq!(tail[1], DrawCommand::Clear(color::black()));
        assert_eq!(
            tail[2],
            DrawCommand::BeginBatch(DrawState::point_clamp().with_sampler(SamplerMode::LinearClamp))
        );
        assert_eq!(
            tail[3],
            DrawCommand::Present {
                source: RenderTargetId::WORLD,
                dest: Rect::new(0.0, 0.0, 1280.0, 720.0),
            }
        );
        assert_eq!(tail[4], DrawCommand::EndBatch);

        assert_eq!(engine.draw_states().depth(RenderTargetId::WORLD), 0);
        assert_eq!(engine.draw_states().depth(RenderTargetId::SCREEN), 0);
    }

    #[test]
    fn test_camera_transform_applies_to_world_pass() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        let config = engine.config().clone();
        let expected = {
            let state = engine.active_scene_mut().unwrap().state_mut();
            state.setup_camera(&config).set_position(Vec2::new(10.0, 0.0));
            state.world_draw_state()
        };
        let mut backend = RecordingBackend::new();

        engine.render(&mut backend, &InputSnapshot::new(), &FrameClock::fixed(1.0 / 60.0));

        assert_eq!(backend.commands()[1], DrawCommand::BeginBatch(expected));
        assert!(expected.transform.is_some());
    }

    #[test]
    fn test_manual_draw_skips_world_batch() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        engine.active_scene_mut().unwrap().state_mut().auto_draw = false;
        let mut backend = RecordingBackend::new();

        engine.render(&mut backend, &InputSnapshot::new(), &FrameClock::fixed(1.0 / 60.0));

        let commands = backend.commands();
        assert!(matches!(commands[1], DrawCommand::Quad { .. }));
        assert_eq!(commands[2], DrawCommand::BeginBatch(DrawState::point_clamp()));
    }

    #[test]
    fn test_update_reaches_ui() {
        let log: Log = Rc::default();
        let mut engine = engine_with_scenes(&log);
        let backend = RecordingBackend::new();
        let input = InputSnapshot::builder()
            .pointer(10.0, 10.0)
            .press(MouseButton::Left)
            .build();

        engine.update(&input, &FrameClock::fixed(1.0 / 60.0), &backend);

        let kinds: Vec<_> = engine.events_mut().drain().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_client_bounds_letterbox() {
        let virtual_size = Vec2::new(1280.0, 720.0);

        assert_eq!(
            client_bounds(Vec2::new(1920.0, 1080.0), virtual_size),
            Rect::new(0.0, 0.0, 1920.0, 1080.0)
        );
        assert_eq!(
            client_bounds(Vec2::new(1000.0, 1000.0), virtual_size),
            Rect::new(0.0, 219.0, 1000.0, 562.0)
        );
        assert_eq!(
            client_bounds(Vec2::new(2000.0, 720.0), virtual_size),
            Rect::new(360.0, 0.0, 1280.0, 720.0)
        );
        assert_eq!(client_bounds(Vec2::zeros(), virtual_size), Rect::EMPTY);
    }

    #[test]
    fn test_window_to_virtual() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.set_back_buffer_size(2560.0, 1440.0);

        let point = engine.window_to_virtual(Vec2::new(1280.0, 720.0));

        assert_relative_eq!(point.x, 640.0);
        assert_relative_eq!(point.y, 360.0);
    }
}
