//! Platform subsystem abstraction
//!
//! This module defines the internal contract between the session/surface layer
//! and the windowing system that actually creates windows and OpenGL contexts.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │  PlatformSession / RenderSurface │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ Platform trait  │ ← this module
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwPlatform          │ ← glfw_backend.rs
//!   │ MockPlatform (tests)  │ ← mock.rs
//!   └───────────────────────┘
//! ```
//!
//! The surface never touches GLFW directly. Every acquisition and every
//! teardown call goes through [`Platform`], which keeps the bring-up protocol
//! testable with injected failures.

pub mod glfw_backend;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use glfw_backend::GlfwPlatform;
pub use session::{PlatformSession, SessionError};

use crate::config::WindowConfig;
use crate::render::gl::GraphicsApi;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic reported by the platform layer
///
/// Carries the human-readable message the windowing system produced for the
/// failing call (the equivalent of a "last error" string).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PlatformError {
    message: String,
}

impl PlatformError {
    /// Create a new platform diagnostic
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic text
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// OpenGL context attributes that can be hinted and queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextAttribute {
    /// Context major version
    MajorVersion,
    /// Context minor version
    MinorVersion,
    /// Context profile mask
    Profile,
}

impl fmt::Display for ContextAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MajorVersion => "major",
            Self::MinorVersion => "minor",
            Self::Profile => "profile",
        };
        f.write_str(name)
    }
}

/// OpenGL context profile
///
/// The raw values are the profile mask bits exchanged with the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlProfile {
    /// Core profile, legacy fixed-function entry points removed
    Core,
    /// Compatibility profile
    Compatibility,
    /// OpenGL ES
    Es,
}

impl GlProfile {
    /// Raw profile mask value
    pub const fn to_raw(self) -> i32 {
        match self {
            Self::Core => 0x1,
            Self::Compatibility => 0x2,
            Self::Es => 0x4,
        }
    }

    /// Decode a raw profile mask value
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0x1 => Some(Self::Core),
            0x2 => Some(Self::Compatibility),
            0x4 => Some(Self::Es),
            _ => None,
        }
    }
}

/// Buffer swap policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapInterval {
    /// Present immediately, no synchronization
    Immediate,
    /// Wait for the vertical blank
    Synchronized,
    /// Synchronize when on time, tear when late
    Adaptive,
}

impl SwapInterval {
    /// Raw swap interval value
    pub const fn to_raw(self) -> i32 {
        match self {
            Self::Immediate => 0,
            Self::Synchronized => 1,
            Self::Adaptive => -1,
        }
    }
}

/// Platform events the core cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The user asked to close the application
    Quit,
    /// The framebuffer changed size
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Anything else (input, focus, ...)
    Other,
}

/// Internal contract implemented by windowing backends
///
/// Handles are associated types so that each backend owns its own window and
/// context representations. Teardown calls consume the handle they release.
///
/// # Thread Safety
/// No `Send` bound. Windowing systems require these calls on the main thread
/// and the context stays current on the thread that created it.
pub trait Platform {
    /// Window handle
    type Window;
    /// Graphics context handle
    type Context;
    /// Loaded graphics API function table
    type Api: GraphicsApi;

    /// Publish a context attribute request for the next window
    fn set_attribute(
        &mut self,
        attribute: ContextAttribute,
        value: i32,
    ) -> Result<(), PlatformError>;

    /// Create a top-level window
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, PlatformError>;

    /// Create a graphics context bound to `window`
    fn create_context(&mut self, window: &mut Self::Window) -> Result<Self::Context, PlatformError>;

    /// Make `context` current on the calling thread
    fn make_current(
        &mut self,
        window: &mut Self::Window,
        context: &Self::Context,
    ) -> Result<(), PlatformError>;

    /// Resolve the graphics API entry points for the current context
    fn load_functions(&mut self, window: &mut Self::Window) -> Result<Self::Api, PlatformError>;

    /// Query the value actually granted for a context attribute
    fn query_attribute(
        &mut self,
        window: &Self::Window,
        attribute: ContextAttribute,
    ) -> Result<i32, PlatformError>;

    /// Request a swap interval for the current context
    fn set_swap_interval(&mut self, interval: SwapInterval) -> Result<(), PlatformError>;

    /// Drain pending events without blocking
    fn poll_events(&mut self, window: &mut Self::Window, events: &mut Vec<PlatformEvent>);

    /// Present the back buffer
    fn present(&mut self, window: &mut Self::Window);

    /// Unbind whatever context is current on the calling thread
    fn release_current(&mut self, window: &mut Self::Window);

    /// Destroy a graphics context
    fn destroy_context(&mut self, window: &mut Self::Window, context: Self::Context);

    /// Destroy a window
    fn destroy_window(&mut self, window: Self::Window);

    /// Shut the subsystem down
    fn shutdown(self);
}
