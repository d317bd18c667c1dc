//! Window + OpenGL context bring-up
//!
//! [`RenderSurface::create`] runs the bring-up protocol in a fixed order:
//!
//! ```text
//! UNINIT -> HINTED -> WINDOWED -> CONTEXTED -> CURRENT -> READY
//! ```
//!
//! The surface value is constructed empty before the first phase and fills in
//! as each resource is acquired. A fatal phase returns early with `?`, which
//! drops the partially built surface; its `Drop` releases exactly what was
//! acquired, in reverse order. The session is released afterwards by its own
//! scope.
//!
//! Non-fatal problems (rejected hints, attributes that differ from the
//! request, refused adaptive vsync) are collected as [`SurfaceWarning`]s and
//! surface as [`SurfaceStatus::OkWithWarnings`].

use super::gl::GraphicsApi;
use super::ClearColor;
use crate::config::{ContextRequest, SurfaceConfig};
use crate::platform::{
    ContextAttribute, GlProfile, Platform, PlatformError, PlatformEvent, PlatformSession,
    SwapInterval,
};
use std::marker::PhantomData;
use thiserror::Error;

/// Fatal bring-up failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The session was released before the surface was created
    #[error("Platform session is not active")]
    SessionInactive,

    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[source] PlatformError),

    /// Context creation failed
    #[error("Failed to create gl context: {0}")]
    ContextCreation(#[source] PlatformError),

    /// Binding the context to the calling thread failed
    #[error("Failed to make context current: {0}")]
    MakeCurrent(#[source] PlatformError),

    /// The function loader resolved nothing
    #[error("Failed to load GL function pointers: {0}")]
    Loader(#[source] PlatformError),
}

/// Non-fatal deviations from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceWarning {
    /// The platform rejected an attribute hint
    HintRejected {
        /// Attribute that was hinted
        attribute: ContextAttribute,
        /// Platform diagnostic
        reason: String,
    },
    /// The granted value of an attribute could not be queried
    QueryFailed {
        /// Attribute that was queried
        attribute: ContextAttribute,
        /// Platform diagnostic
        reason: String,
    },
    /// The granted value differs from the requested one
    Mismatch {
        /// Attribute that differs
        attribute: ContextAttribute,
        /// Requested raw value
        requested: i32,
        /// Granted raw value
        granted: i32,
    },
    /// Adaptive vsync was refused; the driver default interval is in effect
    AdaptiveVsyncUnsupported {
        /// Platform diagnostic
        reason: String,
    },
}

/// Outcome of a successful [`RenderSurface::create`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// Everything requested was granted
    Ok,
    /// Usable, but at least one [`SurfaceWarning`] was raised
    OkWithWarnings,
}

/// Bring-up progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SurfaceState {
    /// Nothing acquired
    Uninit,
    /// Attribute hints published
    Hinted,
    /// Window exists
    Windowed,
    /// Context exists
    Contexted,
    /// Context is current on the creating thread
    Current,
    /// Function table loaded, attributes verified, swap interval negotiated
    Ready,
}

/// Context attributes the platform actually granted
///
/// A field is `None` when its query failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrantedAttributes {
    /// Granted major version
    pub major: Option<i32>,
    /// Granted minor version
    pub minor: Option<i32>,
    /// Granted profile
    pub profile: Option<GlProfile>,
}

/// A window with a current OpenGL context
///
/// Mutably borrows the platform owned by a [`PlatformSession`], so the session
/// cannot be released while the surface exists. Not `Send`: the context stays
/// on the thread that made it current.
pub struct RenderSurface<'s, P: Platform> {
    platform: &'s mut P,
    window: Option<P::Window>,
    context: Option<P::Context>,
    api: Option<P::Api>,
    current: bool,
    state: SurfaceState,
    granted: GrantedAttributes,
    warnings: Vec<SurfaceWarning>,
    _thread_bound: PhantomData<*const ()>,
}

/// Log a fatal phase failure and wrap it
fn fatal(wrap: fn(PlatformError) -> SurfaceError, err: PlatformError) -> SurfaceError {
    let err = wrap(err);
    log::error!("CRITICAL: {err}. EXITING.");
    err
}

impl<'s, P: Platform> RenderSurface<'s, P> {
    /// Run the bring-up protocol
    ///
    /// `Err` is the fatal outcome; every resource acquired before the failure
    /// has already been released when this returns.
    pub fn create(
        session: &'s mut PlatformSession<P>,
        config: &SurfaceConfig,
    ) -> Result<Self, SurfaceError> {
        let Some(platform) = session.platform_mut() else {
            log::error!("CRITICAL: {}. EXITING.", SurfaceError::SessionInactive);
            return Err(SurfaceError::SessionInactive);
        };

        let mut surface = Self {
            platform,
            window: None,
            context: None,
            api: None,
            current: false,
            state: SurfaceState::Uninit,
            granted: GrantedAttributes::default(),
            warnings: Vec::new(),
            _thread_bound: PhantomData,
        };

        surface.publish_hints(&config.context);

        let window = surface
            .platform
            .create_window(&config.window)
            .map_err(|err| fatal(SurfaceError::WindowCreation, err))?;
        let window = surface.window.insert(window);
        surface.state = SurfaceState::Windowed;
        log::info!("Window created.");

        let context = surface
            .platform
            .create_context(window)
            .map_err(|err| fatal(SurfaceError::ContextCreation, err))?;
        let context = surface.context.insert(context);
        surface.state = SurfaceState::Contexted;
        log::info!("GL context created.");

        surface
            .platform
            .make_current(window, context)
            .map_err(|err| fatal(SurfaceError::MakeCurrent, err))?;
        surface.current = true;
        surface.state = SurfaceState::Current;

        let api = surface
            .platform
            .load_functions(window)
            .map_err(|err| fatal(SurfaceError::Loader, err))?;
        let unknown = || "<unknown>".to_string();
        log::info!("OpenGL version: {}", api.version_string().unwrap_or_else(unknown));
        log::info!("Renderer: {}", api.renderer_string().unwrap_or_else(unknown));
        surface.api = Some(api);

        surface.verify_granted(&config.context);
        surface.negotiate_swap_interval(config.swap_interval);
        surface.state = SurfaceState::Ready;

        Ok(surface)
    }

    fn publish_hints(&mut self, request: &ContextRequest) {
        let hints = [
            (ContextAttribute::MajorVersion, request.major),
            (ContextAttribute::MinorVersion, request.minor),
            (ContextAttribute::Profile, request.profile.to_raw()),
        ];
        for (attribute, value) in hints {
            log::info!("Set OpenGL {attribute} attribute: {value}");
            if let Err(err) = self.platform.set_attribute(attribute, value) {
                log::warn!("Could not set OpenGL {attribute} attribute: {err}");
                self.warnings.push(SurfaceWarning::HintRejected {
                    attribute,
                    reason: err.to_string(),
                });
            }
        }
        self.state = SurfaceState::Hinted;
    }

    fn verify_granted(&mut self, request: &ContextRequest) {
        let checks = [
            (ContextAttribute::MajorVersion, request.major),
            (ContextAttribute::MinorVersion, request.minor),
            (ContextAttribute::Profile, request.profile.to_raw()),
        ];
        for (attribute, requested) in checks {
            let Some(window) = self.window.as_ref() else {
                return;
            };
            match self.platform.query_attribute(window, attribute) {
                Ok(granted) => {
                    self.record_granted(attribute, granted);
                    if granted != requested {
                        log::warn!(
                            "Requested {attribute} attr val does not match assigned \
                             (mismatch: requested {requested}, granted {granted})"
                        );
                        self.warnings.push(SurfaceWarning::Mismatch {
                            attribute,
                            requested,
                            granted,
                        });
                    }
                }
                Err(err) => {
                    log::warn!("Could not get OpenGL {attribute} attribute: {err}");
                    self.warnings.push(SurfaceWarning::QueryFailed {
                        attribute,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    fn record_granted(&mut self, attribute: ContextAttribute, granted: i32) {
        match attribute {
            ContextAttribute::MajorVersion => {
                log::info!("Assigned OpenGL major: {granted}");
                self.granted.major = Some(granted);
            }
            ContextAttribute::MinorVersion => {
                log::info!("Assigned OpenGL minor: {granted}");
                self.granted.minor = Some(granted);
            }
            ContextAttribute::Profile => {
                let profile = GlProfile::from_raw(granted);
                match profile {
                    Some(profile) => log::info!("Assigned OpenGL profile: {profile:?}"),
                    None => log::info!("Assigned OpenGL profile: {granted:#x}"),
                }
                self.granted.profile = profile;
            }
        }
    }

    fn negotiate_swap_interval(&mut self, interval: SwapInterval) {
        match self.platform.set_swap_interval(interval) {
            Ok(()) => log::info!("Swap interval set to {}", interval.to_raw()),
            Err(err) if interval == SwapInterval::Adaptive => {
                log::warn!("Adaptive VSYNC not supported: {err}");
                self.warnings
                    .push(SurfaceWarning::AdaptiveVsyncUnsupported { reason: err.to_string() });
            }
            Err(err) => log::warn!("Could not set swap interval {}: {err}", interval.to_raw()),
        }
    }

    /// Whether every requested attribute was honored
    pub fn status(&self) -> SurfaceStatus {
        if self.warnings.is_empty() {
            SurfaceStatus::Ok
        } else {
            SurfaceStatus::OkWithWarnings
        }
    }

    /// Warnings raised during bring-up
    pub fn warnings(&self) -> &[SurfaceWarning] {
        &self.warnings
    }

    /// Attributes the platform granted
    pub const fn granted(&self) -> GrantedAttributes {
        self.granted
    }

    /// Current lifecycle state
    pub const fn state(&self) -> SurfaceState {
        self.state
    }

    /// Drain pending platform events into `events`
    pub fn poll_events(&mut self, events: &mut Vec<PlatformEvent>) {
        if let Some(window) = self.window.as_mut() {
            self.platform.poll_events(window, events);
        }
    }

    /// Set the clear color and clear the color buffer
    ///
    /// No-op once the surface is destroyed.
    pub fn clear(&mut self, color: ClearColor) {
        if let Some(api) = self.api.as_mut() {
            api.set_clear_color(color);
            api.clear_color_buffer();
        }
    }

    /// Present the back buffer
    pub fn present(&mut self) {
        if self.api.is_none() {
            return;
        }
        if let Some(window) = self.window.as_mut() {
            self.platform.present(window);
        }
    }

    /// Unbind the context, destroy it, destroy the window
    ///
    /// Idempotent. Also runs on drop, including for partially built surfaces.
    pub fn destroy(&mut self) {
        self.api = None;

        if let Some(window) = self.window.as_mut() {
            if self.current {
                self.platform.release_current(window);
                self.current = false;
            }
            if let Some(context) = self.context.take() {
                self.platform.destroy_context(window, context);
                log::debug!("GL context destroyed.");
            }
        }
        if let Some(window) = self.window.take() {
            self.platform.destroy_window(window);
            log::debug!("Window destroyed.");
        }
        self.state = SurfaceState::Uninit;
    }
}

impl<P: Platform> Drop for RenderSurface<'_, P> {
    fn drop(&mut self) {
        self.destroy();
    }
}
