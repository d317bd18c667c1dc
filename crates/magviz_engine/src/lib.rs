//! # MagViz Engine
//!
//! Window and OpenGL context bring-up plus the presentation loop for the
//! MagViz visualizer.
//!
//! ## Startup
//!
//! 1. [`PlatformSession`](platform::PlatformSession) initializes the video subsystem
//! 2. [`RenderSurface`](render::RenderSurface) creates the window, the 3.3 core
//!    context and the function table, and negotiates adaptive vsync
//! 3. [`FrameLoop`](render::FrameLoop) clears and presents until the window closes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use magviz_engine::{application, foundation::logging};
//!
//! fn main() -> std::process::ExitCode {
//!     logging::init();
//!     application::run_default().into()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod application;
pub mod config;
pub mod foundation;
pub mod platform;
pub mod render;

pub use application::AppExit;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        application::{run, run_default, AppExit},
        config::{Config, ConfigError, ContextRequest, SurfaceConfig, WindowConfig, WindowFlags},
        platform::{
            GlProfile, GlfwPlatform, Platform, PlatformError, PlatformSession, SwapInterval,
        },
        render::{
            ClearColor, FrameLoop, FrameStats, RenderSurface, SurfaceError, SurfaceStatus,
            SurfaceWarning,
        },
    };
}
