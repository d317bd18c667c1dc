//! OpenGL function table
//!
//! The `gl` crate keeps its entry points in process-wide statics. Access goes
//! through [`GlFunctionTable`], which can only be obtained by loading the
//! entry points while a context is current. Holding one is the proof that the
//! calls below are valid on this thread.

use super::ClearColor;
use std::ffi::{c_void, CStr};
use std::marker::PhantomData;

/// Graphics API calls used by the frame loop
pub trait GraphicsApi {
    /// Set the color used by subsequent clears
    fn set_clear_color(&mut self, color: ClearColor);

    /// Clear the color buffer
    fn clear_color_buffer(&mut self);

    /// `GL_VERSION` string of the current context
    fn version_string(&self) -> Option<String>;

    /// `GL_RENDERER` string of the current context
    fn renderer_string(&self) -> Option<String>;
}

/// Loaded OpenGL entry points
///
/// Not `Send`: the table is only valid on the thread whose context was current
/// when it was loaded.
pub struct GlFunctionTable {
    _thread_bound: PhantomData<*const ()>,
}

impl GlFunctionTable {
    /// Resolve the entry points through `lookup`
    ///
    /// Returns `None` when the entry points the frame loop relies on could not
    /// be resolved.
    pub fn load<F>(mut lookup: F) -> Option<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(|symbol| lookup(symbol));

        let loaded =
            gl::ClearColor::is_loaded() && gl::Clear::is_loaded() && gl::GetString::is_loaded();
        loaded.then(|| Self {
            _thread_bound: PhantomData,
        })
    }

    fn string(name: gl::types::GLenum) -> Option<String> {
        // SAFETY: the table exists only while its context is current and GetString is loaded.
        let ptr = unsafe { gl::GetString(name) };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: GL returns a static NUL-terminated string for valid names.
        let text = unsafe { CStr::from_ptr(ptr.cast()) };
        Some(text.to_string_lossy().into_owned())
    }
}

impl GraphicsApi for GlFunctionTable {
    fn set_clear_color(&mut self, color: ClearColor) {
        // SAFETY: see `GlFunctionTable`.
        unsafe { gl::ClearColor(color.r, color.g, color.b, color.a) };
    }

    fn clear_color_buffer(&mut self) {
        // SAFETY: see `GlFunctionTable`.
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };
    }

    fn version_string(&self) -> Option<String> {
        Self::string(gl::VERSION)
    }

    fn renderer_string(&self) -> Option<String> {
        Self::string(gl::RENDERER)
    }
}
