//! Full-area colour fade

use std::any::Any;

use super::{Effect, EffectTimer};
use crate::foundation::easing::Easing;
use crate::foundation::math::{utils, Rect, Vec4};
use crate::render::RenderBackend;

/// Draws a tinted quad over `area` whose alpha moves from `from` to `to`
#[derive(Debug, Clone)]
pub struct FadeEffect {
    /// Covered region
    pub area: Rect,
    /// Overlay colour; its alpha is replaced by the animated value
    pub color: Vec4,
    /// Curve applied to the progress
    pub easing: Easing,
    from: f32,
    to: f32,
    timer: EffectTimer,
}

impl FadeEffect {
    /// Fade over `duration` seconds
    pub fn new(area: Rect, color: Vec4, from: f32, to: f32, duration: f32) -> Self {
        Self {
            area,
            color,
            easing: Easing::Linear,
            from,
            to,
            timer: EffectTimer::new(Some(duration)),
        }
    }

    /// Alpha for the current timer state
    pub fn alpha(&self) -> f32 {
        let t = self.timer.progress().unwrap_or(1.0);
        utils::lerp(self.from, self.to, self.easing.apply(t))
    }
}

impl Effect for FadeEffect {
    fn timer(&self) -> &EffectTimer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut EffectTimer {
        &mut self.timer
    }

    fn apply(&mut self, backend: &mut dyn RenderBackend) {
        let mut tint = self.color;
        tint.w = self.alpha();
        backend.draw_quad(None, self.area, tint);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_alpha_follows_progress() {
        let mut fade = FadeEffect::new(Rect::new(0.0, 0.0, 1.0, 1.0), Vec4::zeros(), 1.0, 0.0, 2.0);
        assert_relative_eq!(fade.alpha(), 1.0);

        fade.update(0.5);
        assert_relative_eq!(fade.alpha(), 0.75);

        fade.update(5.0);
        assert_relative_eq!(fade.alpha(), 0.0);
    }
}
