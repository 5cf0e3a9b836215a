//! Backend abstraction traits for the 2D renderer
//!
//! The rasterizer is an external collaborator. This module defines the
//! narrow interface the UI layer draws through so that any backend (GPU,
//! software, or the headless [`RecordingBackend`](super::RecordingBackend))
//! can sit underneath it.

use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::render::draw_state::DrawState;

/// Opaque texture handle issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque font handle issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontHandle(pub u32);

/// Opaque shader effect handle issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Render target identifier
///
/// Each target owns an independent draw-state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u32);

impl RenderTargetId {
    /// Virtual drawing surface the scene and the UI draw into
    pub const WORLD: Self = Self(0);

    /// Presentation back buffer the virtual surface is composited onto
    pub const SCREEN: Self = Self(1);
}

/// RGBA colour helpers
pub mod color {
    use crate::foundation::math::Vec4;

    /// Opaque white
    pub fn white() -> Vec4 {
        Vec4::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Opaque black
    pub fn black() -> Vec4 {
        Vec4::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Fully transparent
    pub fn transparent() -> Vec4 {
        Vec4::zeros()
    }

    /// Colour from 8-bit channels
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
        Vec4::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }
}

/// Text measurement, the only backend query needed during update
pub trait TextMeasurer {
    /// Size of `text` rendered with `font` at scale 1
    fn measure_text(&self, font: FontHandle, text: &str) -> Vec2;

    /// Height of one line of `font`
    fn line_height(&self, font: FontHandle) -> f32 {
        self.measure_text(font, " ").y
    }
}

/// Main 2D rendering backend trait
pub trait RenderBackend: TextMeasurer {
    /// Draw a tinted quad. `None` draws a solid blank (white) quad.
    fn draw_quad(&mut self, texture: Option<TextureHandle>, dest: Rect, tint: Vec4);

    /// Draw a string with its top-left corner at `position`
    fn draw_text(&mut self, font: FontHandle, text: &str, position: Vec2, tint: Vec4, scale: f32);

    /// Set the scissor rectangle used by states with scissor enabled
    fn set_clip_rect(&mut self, rect: Rect);

    /// Current scissor rectangle
    fn clip_rect(&self) -> Rect;

    /// Open a batch with the given drawing configuration
    fn begin_batch(&mut self, state: &DrawState);

    /// Flush and close the open batch
    fn end_batch(&mut self);

    /// Redirect subsequent batches to a render target (`None` = back buffer)
    fn set_render_target(&mut self, _target: Option<RenderTargetId>) {}

    /// Clear the current render target
    fn clear(&mut self, _color: Vec4) {}

    /// Draw the contents of `source` into `dest` on the current target
    fn present(&mut self, _source: RenderTargetId, _dest: Rect) {}
}
