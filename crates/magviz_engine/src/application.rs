//! Application lifecycle
//!
//! Startup flows session -> surface -> loop; shutdown unwinds in reverse as
//! each owner goes out of scope.

use crate::config::SurfaceConfig;
use crate::platform::{Platform, PlatformError, PlatformSession, SessionError};
use crate::render::{FrameLoop, FrameStats, RenderSurface, SurfaceStatus};
use std::process::ExitCode;

/// How the application ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    /// The user closed the window
    Clean,
    /// A fatal initialization error; already logged at critical severity
    Fatal,
}

impl AppExit {
    /// Process exit code
    pub const fn code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Fatal => 1,
        }
    }
}

impl From<AppExit> for ExitCode {
    fn from(exit: AppExit) -> Self {
        Self::from(exit.code())
    }
}

/// Run the application on GLFW with the shipped configuration
pub fn run_default() -> AppExit {
    log::info!("MagViz Starting...");
    drive(PlatformSession::acquire(), &SurfaceConfig::default()).0
}

/// Run the application on any platform backend
///
/// Returns the exit status and, when the loop ran, its statistics.
pub fn run<P, F>(init: F, config: &SurfaceConfig) -> (AppExit, Option<FrameStats>)
where
    P: Platform,
    F: FnOnce() -> Result<P, PlatformError>,
{
    log::info!("MagViz Starting...");
    drive(PlatformSession::acquire_with(init), config)
}

fn drive<P: Platform>(
    session: Result<PlatformSession<P>, SessionError>,
    config: &SurfaceConfig,
) -> (AppExit, Option<FrameStats>) {
    let Ok(mut session) = session else {
        return (AppExit::Fatal, None);
    };

    let Ok(mut surface) = RenderSurface::create(&mut session, config) else {
        return (AppExit::Fatal, None);
    };
    if surface.status() == SurfaceStatus::OkWithWarnings {
        log::info!(
            "Continuing with {} bring-up warning(s); granted {:?}",
            surface.warnings().len(),
            surface.granted()
        );
    }

    let stats = FrameLoop::new(&mut surface).run();

    drop(surface);
    session.release();
    log::info!("MagViz shut down cleanly");
    (AppExit::Clean, Some(stats))
}
