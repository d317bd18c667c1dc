//! Window and context request configuration
//!
//! The defaults are the values the application ships with. Other values are
//! only used by callers that construct a [`SurfaceConfig`] themselves.

use super::Config;
use crate::platform::{GlProfile, SwapInterval};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Requested OpenGL major version
pub const REQUESTED_MAJOR: i32 = 3;
/// Requested OpenGL minor version
pub const REQUESTED_MINOR: i32 = 3;
/// Requested OpenGL profile
pub const REQUESTED_PROFILE: GlProfile = GlProfile::Core;
/// Window title
pub const WINDOW_TITLE: &str = "MagViz";
/// Initial client-area width
pub const INITIAL_WIDTH: u32 = 800;
/// Initial client-area height
pub const INITIAL_HEIGHT: u32 = 800;

bitflags! {
    /// Window creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        /// User can resize the window
        const RESIZABLE = 1 << 0;
        /// Window carries an OpenGL context
        const OPENGL = 1 << 1;
    }
}

/// Top-level window parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial client-area width in pixels
    pub width: u32,
    /// Initial client-area height in pixels
    pub height: u32,
    /// Creation flags
    pub flags: WindowFlags,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            width: INITIAL_WIDTH,
            height: INITIAL_HEIGHT,
            flags: WindowFlags::RESIZABLE | WindowFlags::OPENGL,
        }
    }
}

/// Requested OpenGL context version and profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRequest {
    /// Major version
    pub major: i32,
    /// Minor version
    pub minor: i32,
    /// Profile
    pub profile: GlProfile,
}

impl Default for ContextRequest {
    fn default() -> Self {
        Self {
            major: REQUESTED_MAJOR,
            minor: REQUESTED_MINOR,
            profile: REQUESTED_PROFILE,
        }
    }
}

/// Everything [`RenderSurface::create`](crate::render::RenderSurface::create) needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Window parameters
    pub window: WindowConfig,
    /// Context request
    pub context: ContextRequest,
    /// Swap interval requested once the context is current
    pub swap_interval: SwapInterval,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            context: ContextRequest::default(),
            swap_interval: SwapInterval::Adaptive,
        }
    }
}

impl Config for SurfaceConfig {}
