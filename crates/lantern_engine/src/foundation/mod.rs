//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and rectangles
//! - Easing curves
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod easing;
pub mod time;
pub mod logging;
