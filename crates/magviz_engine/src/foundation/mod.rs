//! Foundation module - Core utilities
//!
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod time;
