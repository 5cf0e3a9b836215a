//! Draw-state stack
//!
//! Nested save/restore of the drawing configuration, one stack per render
//! target. `begin` closes whatever batch is open and opens a new one; `end`
//! closes the current batch and reopens the state below it verbatim.

use crate::foundation::math::Mat3;
use crate::render::backend::{RenderBackend, RenderTargetId, ShaderHandle};
use std::collections::HashMap;

/// Order in which a batch submits its quads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Submission order, flushed at end
    #[default]
    Deferred,
    /// Each draw flushed immediately
    Immediate,
    /// Grouped by texture
    Texture,
    /// Sorted by depth, far to near
    BackToFront,
    /// Sorted by depth, near to far
    FrontToBack,
}

/// Colour blending equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Premultiplied alpha blending
    #[default]
    AlphaBlend,
    /// Source added onto destination
    Additive,
    /// Source replaces destination
    Opaque,
    /// Straight (non-premultiplied) alpha blending
    NonPremultiplied,
}

/// Texture sampling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerMode {
    /// Nearest filtering, clamped coordinates
    #[default]
    PointClamp,
    /// Nearest filtering, wrapped coordinates
    PointWrap,
    /// Bilinear filtering, clamped coordinates
    LinearClamp,
    /// Bilinear filtering, wrapped coordinates
    LinearWrap,
}

/// Depth and stencil configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthStencilMode {
    /// No depth test
    #[default]
    None,
    /// Depth test and write
    Default,
    /// Depth test without write
    DepthRead,
}

/// Rasterizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizerMode {
    /// Cull counter-clockwise faces
    pub cull_ccw: bool,
    /// Clip draws to the backend clip rectangle
    pub scissor: bool,
}

impl RasterizerMode {
    /// Default rasterizer with scissor testing enabled
    pub const SCISSOR: Self = Self {
        cull_ccw: false,
        scissor: true,
    };
}

/// One entry of the draw-state stack
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawState {
    /// Sort mode
    pub sort_mode: SortMode,
    /// Blend mode
    pub blend: BlendMode,
    /// Sampler mode
    pub sampler: SamplerMode,
    /// Depth/stencil mode
    pub depth_stencil: DepthStencilMode,
    /// Rasterizer mode
    pub rasterizer: RasterizerMode,
    /// Optional shader effect
    pub effect: Option<ShaderHandle>,
    /// Optional transform applied to every draw in the batch
    pub transform: Option<Mat3>,
}

impl DrawState {
    /// Alpha-blended, point-clamped state
    pub fn point_clamp() -> Self {
        Self::default()
    }

    /// State used by clipped widgets: scissor enabled, alpha blend, point clamp
    pub fn scissor() -> Self {
        Self {
            rasterizer: RasterizerMode::SCISSOR,
            ..Self::default()
        }
    }

    /// Replace the sampler
    #[must_use]
    pub fn with_sampler(mut self, sampler: SamplerMode) -> Self {
        self.sampler = sampler;
        self
    }

    /// Replace the transform
    #[must_use]
    pub fn with_transform(mut self, transform: Option<Mat3>) -> Self {
        self.transform = transform;
        self
    }
}

/// Draw-state errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawStateError {
    /// `end` called with nothing pushed for this target
    #[error("draw-state stack underflow on render target {target:?}")]
    StackUnderflow {
        /// Target whose stack was empty
        target: RenderTargetId,
    },
}

/// Per-target stack of draw states
#[derive(Debug, Default)]
pub struct DrawStateStack {
    stacks: HashMap<RenderTargetId, Vec<DrawState>>,
}

impl DrawStateStack {
    /// Create an empty stack set
    pub fn new() -> Self {
        Self::default()
    }

    /// Push and activate a state, closing the open batch first if any
    pub fn begin(&mut self, backend: &mut dyn RenderBackend, target: RenderTargetId, state: DrawState) {
        let stack = self.stacks.entry(target).or_default();

        if !stack.is_empty() {
            backend.end_batch();
        }

        stack.push(state);
        backend.begin_batch(&state);
    }

    /// Pop the current state and reactivate the one below it
    ///
    /// # Panics
    /// Panics when nothing is pushed for `target`. Unbalanced begin/end
    /// calls are a bug in the caller.
    pub fn end(&mut self, backend: &mut dyn RenderBackend, target: RenderTargetId) {
        if let Err(err) = self.try_end(backend, target) {
            log::error!("{}", err);
            panic!("{}", err);
        }
    }

    /// Checked variant of [`DrawStateStack::end`]
    pub fn try_end(
        &mut self,
        backend: &mut dyn RenderBackend,
        target: RenderTargetId,
    ) -> Result<(), DrawStateError> {
        let stack = self
            .stacks
            .get_mut(&target)
            .filter(|stack| !stack.is_empty())
            .ok_or(DrawStateError::StackUnderflow { target })?;

        stack.pop();
        backend.end_batch();

        if let Some(previous) = stack.last() {
            backend.begin_batch(previous);
        }

        Ok(())
    }

    /// Active state for a target
    pub fn current(&self, target: RenderTargetId) -> Option<&DrawState> {
        self.stacks.get(&target).and_then(|stack| stack.last())
    }

    /// Number of states pushed for a target
    pub fn depth(&self, target: RenderTargetId) -> usize {
        self.stacks.get(&target).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawCommand, RecordingBackend};

    fn state(sort_mode: SortMode) -> DrawState {
        DrawState {
            sort_mode,
            ..DrawState::default()
        }
    }

    #[test]
    fn test_nested_pop_restores_outer_state() {
        let mut backend = RecordingBackend::new();
        let mut stack = DrawStateStack::new();
        let target = RenderTargetId::SCREEN;

        let s1 = state(SortMode::Deferred);
        let s2 = state(SortMode::Immediate);
        let s3 = state(SortMode::Texture);

        stack.begin(&mut backend, target, s1);
        stack.begin(&mut backend, target, s2);
        stack.begin(&mut backend, target, s3);
        stack.end(&mut backend, target);
        stack.end(&mut backend, target);

        assert_eq!(stack.current(target), Some(&s1));
        assert_eq!(stack.depth(target), 1);
        assert_eq!(backend.active_state(), Some(&s1));

        assert_eq!(
            backend.commands(),
            &[
                DrawCommand::BeginBatch(s1),
                DrawCommand::EndBatch,
                DrawCommand::BeginBatch(s2),
                DrawCommand::EndBatch,
                DrawCommand::BeginBatch(s3),
                DrawCommand::EndBatch,
                DrawCommand::BeginBatch(s2),
                DrawCommand::EndBatch,
                DrawCommand::BeginBatch(s1),
            ]
        );
    }

    #[test]
    fn test_try_end_underflow() {
        let mut backend = RecordingBackend::new();
        let mut stack = DrawStateStack::new();

        let result = stack.try_end(&mut backend, RenderTargetId::WORLD);
        assert_eq!(
            result,
            Err(DrawStateError::StackUnderflow {
                target: RenderTargetId::WORLD
            })
        );
        assert!(backend.commands().is_empty());
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn test_end_underflow_panics() {
        let mut backend = RecordingBackend::new();
        let mut stack = DrawStateStack::new();
        let target = RenderTargetId::SCREEN;

        stack.begin(&mut backend, target, DrawState::default());
        stack.end(&mut backend, target);
        stack.end(&mut backend, target);
    }

    #[test]
    fn test_targets_are_independent() {
        let mut backend = RecordingBackend::new();
        let mut stack = DrawStateStack::new();

        stack.begin(&mut backend, RenderTargetId::WORLD, DrawState::default());
        stack.begin(&mut backend, RenderTargetId::SCREEN, DrawState::scissor());

        assert_eq!(stack.depth(RenderTargetId::WORLD), 1);
        assert_eq!(stack.depth(RenderTargetId::SCREEN), 1);
        assert!(stack.try_end(&mut backend, RenderTargetId::SCREEN).is_ok());
        assert_eq!(stack.depth(RenderTargetId::WORLD), 1);
    }
}
