//! Window and OpenGL context management using GLFW
//!
//! GLFW reports failures through a process-wide error callback rather than
//! return values. The callback stores the latest description in a
//! thread-local slot so each call site can turn it into a [`PlatformError`].
//!
//! GLFW creates the OpenGL context together with its window. The context phase
//! therefore validates the context the window already carries instead of
//! creating a second one.

use super::{ContextAttribute, GlProfile, Platform, PlatformError, PlatformEvent, SwapInterval};
use crate::config::{WindowConfig, WindowFlags};
use crate::render::gl::GlFunctionTable;
use glfw::Context as _;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while a GLFW session is alive; GLFW is a process-wide singleton.
///
/// Guards against two live sessions at once, not against re-initialization:
/// dropping the platform clears it, so a new session may be acquired after the
/// previous one is released.
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = RefCell::new(None);
}

/// Swap-control-tear extensions required for adaptive vsync
const ADAPTIVE_VSYNC_EXTENSIONS: [&str; 2] =
    ["WGL_EXT_swap_control_tear", "GLX_EXT_swap_control_tear"];

#[allow(clippy::needless_pass_by_value)] // signature fixed by glfw
fn record_error(error: glfw::Error, description: String) {
    log::debug!("GLFW error {error:?}: {description}");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(description));
}

fn clear_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

fn take_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

fn error_or(fallback: &str) -> PlatformError {
    PlatformError::new(take_error().unwrap_or_else(|| fallback.to_string()))
}

/// GLFW window with its event receiver
pub struct GlfwWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

/// Marker for the OpenGL context owned by a [`GlfwWindow`]
#[derive(Debug)]
pub struct GlfwContext {
    _private: (),
}

/// GLFW implementation of [`Platform`]
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
}

impl GlfwPlatform {
    /// Initialize GLFW
    ///
    /// Fails if another session is already alive in this process. Once that
    /// session is dropped, GLFW can be initialized again.
    pub fn init() -> Result<Self, PlatformError> {
        if SESSION_ACTIVE.swap(true, Ordering::AcqRel) {
            return Err(PlatformError::new("GLFW is already initialized in this process"));
        }
        clear_error();
        match glfw::init(record_error) {
            Ok(glfw) => Ok(Self { glfw }),
            Err(err) => {
                SESSION_ACTIVE.store(false, Ordering::Release);
                Err(error_or(&format!("{err:?}")))
            }
        }
    }

    fn publish(&mut self, hint: glfw::WindowHint) -> Result<(), PlatformError> {
        clear_error();
        self.glfw.window_hint(hint);
        take_error().map_or(Ok(()), |message| Err(PlatformError::new(message)))
    }
}

impl Drop for GlfwPlatform {
    fn drop(&mut self) {
        // glfw terminates when its last handle is dropped
        SESSION_ACTIVE.store(false, Ordering::Release);
    }
}

impl Platform for GlfwPlatform {
    type Window = GlfwWindow;
    type Context = GlfwContext;
    type Api = GlFunctionTable;

    fn set_attribute(
        &mut self,
        attribute: ContextAttribute,
        value: i32,
    ) -> Result<(), PlatformError> {
        let version = || {
            u32::try_from(value)
                .map_err(|_| PlatformError::new(format!("invalid {attribute} version {value}")))
        };
        let hint = match attribute {
            ContextAttribute::MajorVersion => glfw::WindowHint::ContextVersionMajor(version()?),
            ContextAttribute::MinorVersion => glfw::WindowHint::ContextVersionMinor(version()?),
            ContextAttribute::Profile => {
                let profile = match GlProfile::from_raw(value) {
                    Some(GlProfile::Core) => glfw::OpenGlProfileHint::Core,
                    Some(GlProfile::Compatibility) => glfw::OpenGlProfileHint::Compat,
                    Some(GlProfile::Es) | None => {
                        let message = format!("unsupported profile mask {value:#x}");
                        return Err(PlatformError::new(message));
                    }
                };
                self.publish(glfw::WindowHint::OpenGlProfile(profile))?;
                #[cfg(target_os = "macos")]
                if profile == glfw::OpenGlProfileHint::Core {
                    self.publish(glfw::WindowHint::OpenGlForwardCompat(true))?;
                }
                return Ok(());
            }
        };
        self.publish(hint)
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<GlfwWindow, PlatformError> {
        let client_api = if config.flags.contains(WindowFlags::OPENGL) {
            glfw::ClientApiHint::OpenGl
        } else {
            glfw::ClientApiHint::NoApi
        };
        self.glfw.window_hint(glfw::WindowHint::ClientApi(client_api));
        let resizable = config.flags.contains(WindowFlags::RESIZABLE);
        self.glfw.window_hint(glfw::WindowHint::Resizable(resizable));

        clear_error();
        let (mut window, events) = self
            .glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| error_or("window creation failed"))?;

        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        Ok(GlfwWindow { window, events })
    }

    fn create_context(&mut self, window: &mut GlfwWindow) -> Result<GlfwContext, PlatformError> {
        if window.window.get_client_api() != glfw::ClientApiHint::OpenGl as i32 {
            return Err(PlatformError::new("window was created without an OpenGL context"));
        }
        if window.window.get_context_version().major == 0 {
            return Err(error_or("window reports no OpenGL context version"));
        }
        Ok(GlfwContext { _private: () })
    }

    fn make_current(
        &mut self,
        window: &mut GlfwWindow,
        _context: &GlfwContext,
    ) -> Result<(), PlatformError> {
        clear_error();
        window.window.make_current();
        if window.window.is_current() {
            Ok(())
        } else {
            Err(error_or("context did not become current"))
        }
    }

    fn load_functions(
        &mut self,
        window: &mut GlfwWindow,
    ) -> Result<GlFunctionTable, PlatformError> {
        GlFunctionTable::load(|symbol| window.window.get_proc_address(symbol) as *const _)
            .ok_or_else(|| error_or("no OpenGL entry points could be resolved"))
    }

    fn query_attribute(
        &mut self,
        window: &GlfwWindow,
        attribute: ContextAttribute,
    ) -> Result<i32, PlatformError> {
        let version = window.window.get_context_version();
        let out_of_range = |_| PlatformError::new(format!("{attribute} version out of range"));
        match attribute {
            ContextAttribute::MajorVersion => i32::try_from(version.major).map_err(out_of_range),
            ContextAttribute::MinorVersion => i32::try_from(version.minor).map_err(out_of_range),
            ContextAttribute::Profile => {
                let raw = window.window.get_opengl_profile();
                let profile = if raw == glfw::OpenGlProfileHint::Core as i32 {
                    GlProfile::Core
                } else if raw == glfw::OpenGlProfileHint::Compat as i32 {
                    GlProfile::Compatibility
                } else {
                    return Err(PlatformError::new(format!("unknown OpenGL profile {raw:#x}")));
                };
                Ok(profile.to_raw())
            }
        }
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) -> Result<(), PlatformError> {
        let glfw_interval = match interval {
            SwapInterval::Immediate => glfw::SwapInterval::None,
            SwapInterval::Synchronized => glfw::SwapInterval::Sync(1),
            SwapInterval::Adaptive => {
                let supported = ADAPTIVE_VSYNC_EXTENSIONS
                    .iter()
                    .any(|ext| self.glfw.extension_supported(ext));
                if !supported {
                    return Err(PlatformError::new("swap_control_tear extension not available"));
                }
                glfw::SwapInterval::Adaptive
            }
        };
        clear_error();
        self.glfw.set_swap_interval(glfw_interval);
        take_error().map_or(Ok(()), |message| Err(PlatformError::new(message)))
    }

    fn poll_events(&mut self, window: &mut GlfwWindow, events: &mut Vec<PlatformEvent>) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&window.events) {
            events.push(match event {
                glfw::WindowEvent::Close => PlatformEvent::Quit,
                glfw::WindowEvent::FramebufferSize(width, height) => PlatformEvent::Resized {
                    width: u32::try_from(width).unwrap_or(0),
                    height: u32::try_from(height).unwrap_or(0),
                },
                _ => PlatformEvent::Other,
            });
        }
    }

    fn present(&mut self, window: &mut GlfwWindow) {
        window.window.swap_buffers();
    }

    fn release_current(&mut self, _window: &mut GlfwWindow) {
        glfw::make_context_current(None);
    }

    fn destroy_context(&mut self, _window: &mut GlfwWindow, context: GlfwContext) {
        // The context lives and dies with its GLFW window.
        drop(context);
    }

    fn destroy_window(&mut self, window: GlfwWindow) {
        drop(window);
    }

    fn shutdown(self) {
        drop(self);
    }
}
