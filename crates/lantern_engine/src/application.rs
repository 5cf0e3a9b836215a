//! Application trait

use crate::engine::{Engine, EngineError};

/// Application lifecycle trait
///
/// Implement this trait to describe the scenes of your game. The host loop
/// itself (window, input polling, presentation) stays with the host; see
/// [`Engine::update`] and [`Engine::render`].
pub trait Application {
    /// Register the application's scenes
    ///
    /// Called once by [`Engine::with_application`]. Pass `make_active` to
    /// [`Engine::add_scene`] for the scene that should be shown first.
    fn setup_scenes(&mut self, engine: &mut Engine) -> Result<(), EngineError>;
}
