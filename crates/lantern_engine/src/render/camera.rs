//! # 2D Camera
//!
//! View transform for world-space content: position, rotation and zoom,
//! with the camera position mapped to the centre of the viewport.
//!
//! ## Design Principles
//! - **Backend-agnostic**: pure coordinate math, no rasterizer dependencies
//! - **Explicit context**: scenes own their camera and pass it to whoever needs it

use crate::foundation::math::{utils, Mat3, Point2, Rect, Vec2};

/// 2D camera with screen/world conversion
///
/// # Transform order
/// `view = T(viewport / 2) * S(zoom) * R(rotation) * T(-position)`
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// World position shown at the centre of the viewport
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Uniform zoom factor (1.0 = no zoom)
    pub zoom: f32,

    viewport: Vec2,
}

impl Camera2D {
    /// Create a camera for a viewport of the given pixel size
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            zoom: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Set the camera position
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// World to screen transform
    pub fn view_matrix(&self) -> Mat3 {
        Mat3::new_translation(&(self.viewport * 0.5))
            * Mat3::new_scaling(self.zoom)
            * Mat3::new_rotation(self.rotation)
            * Mat3::new_translation(&(-self.position))
    }

    /// Convert a screen-space point to world space
    ///
    /// A degenerate view (zero zoom) has no inverse; the point is returned
    /// unchanged in that case.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        match self.view_matrix().try_inverse() {
            Some(inverse) => inverse.transform_point(&Point2::from(screen)).coords,
            None => screen,
        }
    }

    /// Convert a world-space point to screen space
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.view_matrix().transform_point(&Point2::from(world)).coords
    }

    /// Keep the visible area inside `bounds`
    pub fn clamp_to_world(&mut self, bounds: Rect) {
        let min = self.screen_to_world(Vec2::zeros());
        let max = self.screen_to_world(self.viewport);
        let half = (max - min) * 0.5;

        self.position = Vec2::new(
            utils::clamp(self.position.x, bounds.x + half.x, bounds.right() - half.x),
            utils::clamp(self.position.y, bounds.y + half.y, bounds.bottom() - half.y),
        );
        log::trace!("Camera clamped to world: {:?}", self.position);
    }
}
