//! Headless recording backend
//!
//! Records every backend call as a [`DrawCommand`] instead of rasterizing.
//! Used by tests and the demo to assert paint order and draw-state nesting
//! without a GPU.

use crate::foundation::math::{Rect, Vec2, Vec4};
use crate::render::backend::{
    FontHandle, RenderBackend, RenderTargetId, TextMeasurer, TextureHandle,
};
use crate::render::draw_state::DrawState;

/// Width of one glyph at scale 1
pub const GLYPH_WIDTH: f32 = 8.0;

/// Height of one line at scale 1
pub const LINE_HEIGHT: f32 = 16.0;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `draw_quad`
    Quad {
        /// Texture, `None` for blank
        texture: Option<TextureHandle>,
        /// Destination rectangle
        dest: Rect,
        /// Tint colour
        tint: Vec4,
    },
    /// `draw_text`
    Text {
        /// Font
        font: FontHandle,
        /// String drawn
        text: String,
        /// Top-left position
        position: Vec2,
        /// Tint colour
        tint: Vec4,
        /// Scale
        scale: f32,
    },
    /// `set_clip_rect`
    SetClip(Rect),
    /// `begin_batch`
    BeginBatch(DrawState),
    /// `end_batch`
    EndBatch,
    /// `set_render_target`
    SetRenderTarget(Option<RenderTargetId>),
    /// `clear`
    Clear(Vec4),
    /// `present`
    Present {
        /// Target whose contents are drawn
        source: RenderTargetId,
        /// Destination rectangle
        dest: Rect,
    },
}

/// Backend that records calls and measures text with a fixed-width font
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    clip: Rect,
    open: Option<DrawState>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::with_surface(1280.0, 720.0)
    }
}

impl RecordingBackend {
    /// Create a backend for a 1280x720 surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend whose initial clip covers the given surface
    pub fn with_surface(width: f32, height: f32) -> Self {
        Self {
            commands: Vec::new(),
            clip: Rect::new(0.0, 0.0, width, height),
            open: None,
        }
    }

    /// Everything recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the log empty
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// State of the currently open batch
    pub fn active_state(&self) -> Option<&DrawState> {
        self.open.as_ref()
    }

    /// Strings drawn so far, in paint order
    pub fn drawn_text(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Quad destinations drawn so far, in paint order
    pub fn drawn_quads(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Quad { dest, .. } => Some(*dest),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for RecordingBackend {
    fn measure_text(&self, _font: FontHandle, text: &str) -> Vec2 {
        let lines = text.split('\n');
        let mut width: f32 = 0.0;
        let mut count = 0;

        for line in lines {
            width = width.max(line.chars().count() as f32 * GLYPH_WIDTH);
            count += 1;
        }

        Vec2::new(width, count as f32 * LINE_HEIGHT)
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_quad(&mut self, texture: Option<TextureHandle>, dest: Rect, tint: Vec4) {
        self.commands.push(DrawCommand::Quad { texture, dest, tint });
    }

    fn draw_text(&mut self, font: FontHandle, text: &str, position: Vec2, tint: Vec4, scale: f32) {
        self.commands.push(DrawCommand::Text {
            font,
            text: text.to_string(),
            position,
            tint,
            scale,
        });
    }

    fn set_clip_rect(&mut self, rect: Rect) {
        self.clip = rect;
        self.commands.push(DrawCommand::SetClip(rect));
    }

    fn clip_rect(&self) -> Rect {
        self.clip
    }

    fn begin_batch(&mut self, state: &DrawState) {
        if self.open.is_some() {
            log::warn!("begin_batch called while a batch is already open");
        }
        self.open = Some(*state);
        self.commands.push(DrawCommand::BeginBatch(*state));
    }

    fn end_batch(&mut self) {
        self.open = None;
        self.commands.push(DrawCommand::EndBatch);
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) {
        self.commands.push(DrawCommand::SetRenderTarget(target));
    }

    fn clear(&mut self, color: Vec4) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn present(&mut self, source: RenderTargetId, dest: Rect) {
        self.commands.push(DrawCommand::Present { source, dest });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_measure() {
        let backend = RecordingBackend::new();
        assert_eq!(backend.measure_text(FontHandle(0), "abcd"), Vec2::new(32.0, 16.0));
        assert_eq!(backend.measure_text(FontHandle(0), "ab\nabc"), Vec2::new(24.0, 32.0));
    }

    #[test]
    fn test_records_in_call_order() {
        let mut backend = RecordingBackend::new();
        backend.begin_batch(&DrawState::default());
        backend.draw_quad(None, Rect::new(0.0, 0.0, 5.0, 5.0), Vec4::zeros());
        backend.draw_text(FontHandle(1), "hi", Vec2::zeros(), Vec4::zeros(), 1.0);
        backend.end_batch();

        assert_eq!(backend.commands().len(), 4);
        assert_eq!(backend.drawn_text(), vec!["hi"]);
        assert_eq!(backend.drawn_quads(), vec![Rect::new(0.0, 0.0, 5.0, 5.0)]);
        assert!(backend.active_state().is_none());
    }
}
