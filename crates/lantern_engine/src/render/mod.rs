//! # Rendering System
//!
//! The 2D rendering surface the UI and scenes draw through.
//!
//! ## Architecture
//!
//! - **Backend**: the rasterizer interface ([`RenderBackend`]), implemented by the host
//! - **Draw states**: per-target nested save/restore of batch configuration
//! - **Camera**: 2D view transform with screen/world conversion
//! - **Recording**: headless backend used by tests and tools
//!
//! ## Design Goals
//!
//! - **API Agnostic**: no graphics API types cross this boundary
//! - **Testable**: everything above the backend runs against [`RecordingBackend`]

pub mod backend;
pub mod camera;
pub mod draw_state;
pub mod recording;

pub use backend::{color, FontHandle, RenderBackend, RenderTargetId, ShaderHandle, TextMeasurer, TextureHandle};
pub use camera::Camera2D;
pub use draw_state::{
    BlendMode, DepthStencilMode, DrawState, DrawStateError, DrawStateStack, RasterizerMode,
    SamplerMode, SortMode,
};
pub use recording::{DrawCommand, RecordingBackend};
