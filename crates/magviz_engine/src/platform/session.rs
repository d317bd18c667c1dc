//! Process-wide platform subsystem lifetime
//!
//! A [`PlatformSession`] owns the initialized windowing subsystem. Surfaces
//! borrow the session, so the borrow checker guarantees that no window or
//! context outlives it. Dropping the session releases the subsystem.

use super::{GlfwPlatform, Platform, PlatformError};
use thiserror::Error;

/// Session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The video subsystem could not be initialized
    #[error("Error initializing video subsystem: {0}")]
    InitFailed(#[source] PlatformError),
}

/// Scoped ownership of the platform video subsystem
pub struct PlatformSession<P: Platform> {
    platform: Option<P>,
}

impl PlatformSession<GlfwPlatform> {
    /// Initialize the GLFW video subsystem
    ///
    /// This is the production entry point. [`acquire_with`](Self::acquire_with)
    /// is the seam for other backends and for tests.
    pub fn acquire() -> Result<Self, SessionError> {
        Self::acquire_with(GlfwPlatform::init)
    }
}

impl<P: Platform> PlatformSession<P> {
    /// Initialize the subsystem through a backend initializer
    ///
    /// On failure nothing is left initialized and the diagnostic is logged at
    /// critical severity.
    pub fn acquire_with<F>(init: F) -> Result<Self, SessionError>
    where
        F: FnOnce() -> Result<P, PlatformError>,
    {
        match init() {
            Ok(platform) => {
                log::info!("Video subsystem initialized.");
                Ok(Self {
                    platform: Some(platform),
                })
            }
            Err(err) => {
                log::error!("CRITICAL: Error initializing video subsystem: {err}. EXITING.");
                Err(SessionError::InitFailed(err))
            }
        }
    }

    /// Whether the subsystem is currently initialized
    pub const fn is_active(&self) -> bool {
        self.platform.is_some()
    }

    /// Shut the subsystem down
    ///
    /// Idempotent; later calls do nothing.
    pub fn release(&mut self) {
        if let Some(platform) = self.platform.take() {
            platform.shutdown();
            log::info!("Video subsystem released.");
        }
    }

    pub(crate) fn platform_mut(&mut self) -> Option<&mut P> {
        self.platform.as_mut()
    }
}

impl<P: Platform> Drop for PlatformSession<P> {
    fn drop(&mut self) {
        self.release();
    }
}
