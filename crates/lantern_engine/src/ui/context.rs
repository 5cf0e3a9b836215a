//! Per-frame contexts passed into the update and render passes
//!
//! Everything a widget may consult (input, clock, camera, the manager that
//! answers hit queries, the backend) arrives through these structs instead
//! of process-wide statics.

use crate::config::UiConfig;
use crate::events::{EventSystem, UiEvent};
use crate::foundation::math::{Rect, Vec2};
use crate::foundation::time::FrameClock;
use crate::input::InputSnapshot;
use crate::render::{
    Camera2D, DrawState, DrawStateStack, FontHandle, RenderBackend, RenderTargetId, TextMeasurer,
};
use crate::ui::hit_test::HitScope;
use crate::ui::manager::UiManager;

/// Host-supplied inputs for one frame
pub struct FrameInput<'a> {
    /// Input snapshot
    pub input: &'a InputSnapshot,
    /// Frame clock
    pub clock: &'a FrameClock,
    /// Active scene camera, if any
    pub camera: Option<&'a Camera2D>,
    /// Widget tuning
    pub config: &'a UiConfig,
    /// Event sink
    pub events: &'a mut EventSystem,
}

/// Context handed to widget update functions
pub struct UpdateContext<'a> {
    /// Input snapshot
    pub input: &'a InputSnapshot,
    /// Frame clock
    pub clock: &'a FrameClock,
    /// Active scene camera, if any
    pub camera: Option<&'a Camera2D>,
    /// Widget tuning
    pub config: &'a UiConfig,
    /// Event sink
    pub events: &'a mut EventSystem,
    /// Text measurement
    pub measurer: &'a dyn TextMeasurer,
    /// Manager running this pass
    pub manager: &'a UiManager,
}

impl<'a> UpdateContext<'a> {
    /// Seconds since the previous frame, after time scaling
    pub fn delta(&self) -> f32 {
        self.clock.scaled_delta_time()
    }

    /// Hit-query scope for this pass
    pub fn hit(&self) -> HitScope<'_> {
        HitScope {
            input: self.input,
            camera: self.camera,
            manager: self.manager,
        }
    }

    /// Queue an event for the host
    pub fn emit(&mut self, event: UiEvent) {
        self.events.send(event);
    }
}

/// Context handed to widget render functions
pub struct RenderContext<'a> {
    /// Backend receiving draw calls
    pub backend: &'a mut dyn RenderBackend,
    /// Draw-state stack shared with the rest of the frame
    pub draw_states: &'a mut DrawStateStack,
    /// Target the UI is drawn into
    pub target: RenderTargetId,
    /// Active scene camera, if any
    pub camera: Option<&'a Camera2D>,
    /// Frame clock
    pub clock: &'a FrameClock,
}

impl<'a> RenderContext<'a> {
    /// Open a scissor batch clipped to `clip` and return the previous clip
    ///
    /// Nested scissors intersect with the enclosing one.
    pub fn push_scissor(&mut self, clip: Rect) -> Rect {
        let previous = self.backend.clip_rect();
        let current = self.draw_states.current(self.target).copied();

        let clip = match current {
            Some(state) if state.rasterizer.scissor => clip.intersection(&previous),
            _ => clip,
        };
        let transform = current.and_then(|state| state.transform);

        // begin flushes the enclosing batch, which must still see its own clip
        self.draw_states
            .begin(&mut *self.backend, self.target, DrawState::scissor().with_transform(transform));
        self.backend.set_clip_rect(clip);

        previous
    }

    /// Close the batch opened by [`RenderContext::push_scissor`]
    pub fn pop_scissor(&mut self, previous: Rect) {
        self.draw_states.end(&mut *self.backend, self.target);
        self.backend.set_clip_rect(previous);
    }
}

/// Adapter exposing a render backend's text measurement on its own
pub(crate) struct BackendMeasurer<'b>(pub &'b dyn RenderBackend);

impl TextMeasurer for BackendMeasurer<'_> {
    fn measure_text(&self, font: FontHandle, text: &str) -> Vec2 {
        self.0.measure_text(font, text)
    }

    fn line_height(&self, font: FontHandle) -> f32 {
        self.0.line_height(font)
    }
}
