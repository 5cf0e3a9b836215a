//! Pop-in scale effect

use std::any::Any;

use super::{Effect, EffectTimer};
use crate::foundation::easing::Easing;
use crate::foundation::math::Vec2;
use crate::render::RenderBackend;

/// Scale animation from `start` past `mid` that settles at `end`
///
/// The first half runs linearly from `start` to `mid`, the second half
/// springs from `mid` to `end` with an elastic-out curve. Hosts read
/// [`PopInEffect::current_scale`] and apply it to whatever they animate.
#[derive(Debug, Clone)]
pub struct PopInEffect {
    start: Vec2,
    mid: Vec2,
    end: Vec2,
    current: Vec2,
    timer: EffectTimer,
}

impl PopInEffect {
    /// New pop-in lasting `duration` seconds
    pub fn new(start: Vec2, mid: Vec2, end: Vec2, duration: f32) -> Self {
        Self {
            start,
            mid,
            end,
            current: start,
            timer: EffectTimer::new(Some(duration)),
        }
    }

    /// Scale computed by the last apply
    pub fn current_scale(&self) -> Vec2 {
        self.current
    }

    /// Scale at a normalized time
    pub fn scale_at(&self, t: f32) -> Vec2 {
        if t < 0.5 {
            self.start.lerp(&self.mid, Easing::Linear.apply(t * 2.0))
        } else {
            self.mid.lerp(&self.end, Easing::ElasticOut.apply((t - 0.5) * 2.0))
        }
    }
}

impl Effect for PopInEffect {
    fn timer(&self) -> &EffectTimer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut EffectTimer {
        &mut self.timer
    }

    fn apply(&mut self, _backend: &mut dyn RenderBackend) {
        self.current = match self.timer.progress() {
            Some(t) => self.scale_at(t),
            None => self.end,
        };
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
