//! Time-driven effects
//!
//! Effects belong to a scene. The engine advances them after the scene
//! update and applies them after the scene has drawn its world content,
//! before the UI is drawn.

pub mod fade;
pub mod pop_in;

pub use fade::FadeEffect;
pub use pop_in::PopInEffect;

use std::any::Any;

use slotmap::SlotMap;

use crate::foundation::time::FrameClock;
use crate::render::RenderBackend;

slotmap::new_key_type! {
    /// Handle to an effect owned by an [`EffectManager`]
    pub struct EffectId;
}

/// Lifetime bookkeeping shared by every effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTimer {
    /// Still running
    pub active: bool,
    /// Total run time in seconds, `None` runs until removed
    pub duration: Option<f32>,
    /// Seconds since start, clamped to the duration
    pub elapsed: f32,
}

impl EffectTimer {
    /// Timer for an effect lasting `duration` seconds
    pub fn new(duration: Option<f32>) -> Self {
        Self {
            active: true,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; returns true on the frame the timer finishes
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += dt;
        match self.duration {
            Some(duration) if self.elapsed >= duration => {
                self.elapsed = duration;
                self.active = false;
                true
            }
            _ => false,
        }
    }

    /// Elapsed fraction in `0..=1`, `None` for open-ended timers or zero durations
    pub fn progress(&self) -> Option<f32> {
        match self.duration {
            Some(duration) if duration > 0.0 => Some((self.elapsed / duration).clamp(0.0, 1.0)),
            _ => None,
        }
    }

    /// Restart from zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }
}

/// A time-driven post effect
pub trait Effect: Any {
    /// Timer state
    fn timer(&self) -> &EffectTimer;

    /// Mutable timer state
    fn timer_mut(&mut self) -> &mut EffectTimer;

    /// Apply the effect for the current frame
    fn apply(&mut self, backend: &mut dyn RenderBackend);

    /// Called once when the timer runs out
    fn on_finished(&mut self) {}

    /// Downcast helper
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast helper
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Advance the timer, firing [`Effect::on_finished`] when it completes
    fn update(&mut self, dt: f32) {
        if self.timer_mut().advance(dt) {
            self.on_finished();
        }
    }

    /// Restart the effect
    fn reset(&mut self) {
        self.timer_mut().reset();
    }

    /// Still running
    fn is_active(&self) -> bool {
        self.timer().active
    }
}

/// Owns a scene's running effects
#[derive(Default)]
pub struct EffectManager {
    effects: SlotMap<EffectId, Box<dyn Effect>>,
    order: Vec<EffectId>,
}

impl std::fmt::Debug for EffectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectManager")
            .field("effects", &self.order.len())
            .finish()
    }
}

impl EffectManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect
    pub fn add<E: Effect>(&mut self, effect: E) -> EffectId {
        let id = self.effects.insert(Box::new(effect));
        self.order.push(id);
        log::trace!("Effect {:?} added ({} running)", id, self.order.len());
        id
    }

    /// Borrow a running effect as its concrete type
    pub fn get<E: Effect>(&self, id: EffectId) -> Option<&E> {
        self.effects.get(id)?.as_any().downcast_ref::<E>()
    }

    /// Mutably borrow a running effect as its concrete type
    pub fn get_mut<E: Effect>(&mut self, id: EffectId) -> Option<&mut E> {
        self.effects.get_mut(id)?.as_any_mut().downcast_mut::<E>()
    }

    /// Stop an effect early
    pub fn remove(&mut self, id: EffectId) -> bool {
        self.order.retain(|&other| other != id);
        self.effects.remove(id).is_some()
    }

    /// Advance every effect and drop the ones that finished
    pub fn update(&mut self, clock: &FrameClock) {
        let dt = clock.scaled_delta_time();
        let effects = &mut self.effects;

        self.order.retain(|&id| {
            let Some(effect) = effects.get_mut(id) else {
                return false;
            };

            effect.update(dt);
            if effect.is_active() {
                return true;
            }

            log::trace!("Effect {:?} finished", id);
            effects.remove(id);
            false
        });
    }

    /// Apply every effect, most recently added first
    pub fn apply(&mut self, backend: &mut dyn RenderBackend) {
        for &id in self.order.iter().rev() {
            if let Some(effect) = self.effects.get_mut(id) {
                effect.apply(backend);
            }
        }
    }

    /// Drop every effect
    pub fn clear(&mut self) {
        self.effects.clear();
        self.order.clear();
    }

    /// Number of running effects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// No effect is running
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rect, Vec2, Vec4};
    use crate::render::RecordingBackend;

    #[test]
    fn test_timer_finishes_once() {
        let mut timer = EffectTimer::new(Some(1.0));
        assert!(!timer.advance(0.6));
        assert!(timer.advance(0.6));
        assert_eq!(timer.elapsed, 1.0);
        assert!(!timer.advance(0.6));
        assert!(!timer.active);
    }

    #[test]
    fn test_open_ended_timer_never_finishes() {
        let mut timer = EffectTimer::new(None);
        assert!(!timer.advance(1000.0));
        assert!(timer.active);
        assert_eq!(timer.progress(), None);
    }

    #[test]
    fn test_manager_removes_finished_effects() {
        let mut manager = EffectManager::new();
        let short = manager.add(PopInEffect::new(Vec2::zeros(), Vec2::new(1.2, 1.2), Vec2::new(1.0, 1.0), 0.5));
        let long = manager.add(PopInEffect::new(Vec2::zeros(), Vec2::new(1.2, 1.2), Vec2::new(1.0, 1.0), 2.0));

        manager.update(&FrameClock::fixed(1.0));

        assert_eq!(manager.len(), 1);
        assert!(manager.get::<PopInEffect>(short).is_none());
        assert!(manager.get::<PopInEffect>(long).is_some());
        assert!(manager.get::<FadeEffect>(long).is_none());
    }

    #[test]
    fn test_apply_runs_newest_first() {
        let mut manager = EffectManager::new();
        let area = Rect::new(0.0, 0.0, 10.0, 10.0);
        manager.add(FadeEffect::new(area, Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0, 1.0, 1.0));
        manager.add(FadeEffect::new(area, Vec4::new(0.0, 0.0, 1.0, 1.0), 1.0, 1.0, 1.0));

        let mut backend = RecordingBackend::new();
        manager.apply(&mut backend);

        let tints: Vec<f32> = backend
            .commands()
            .iter()
            .filter_map(|command| match command {
                crate::render::DrawCommand::Quad { tint, .. } => Some(tint.z),
                _ => None,
            })
            .collect();
        assert_eq!(tints, vec![1.0, 0.0]);
    }

    #[test]
    fn test_clear() {
        let mut manager = EffectManager::new();
        manager.add(PopInEffect::new(Vec2::zeros(), Vec2::zeros(), Vec2::zeros(), 1.0));
        manager.clear();
        assert!(manager.is_empty());
    }
}
