//! Rendering: window + context bring-up and the presentation loop
//!
//! - **`surface`**: [`RenderSurface`], the window/context pair and its bring-up protocol
//! - **`gl`**: the OpenGL function table and the [`GraphicsApi`](gl::GraphicsApi) seam
//! - **`frame_loop`**: [`FrameLoop`] and its per-frame [`FrameState`]

pub mod frame_loop;
pub mod gl;
pub mod surface;

pub use frame_loop::{ClearColor, FrameLoop, FrameState, FrameStats, RED_STEP};
pub use surface::{
    GrantedAttributes, RenderSurface, SurfaceError, SurfaceState, SurfaceStatus, SurfaceWarning,
};
