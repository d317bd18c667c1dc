//! Presentation loop
//!
//! Each iteration drains events, advances the clear color, clears and
//! presents, in that order. There is no pacing here: frame rate is whatever
//! the negotiated swap interval produces.

use super::RenderSurface;
use crate::foundation::time::Timer;
use crate::platform::{Platform, PlatformEvent};

/// Fixed-point steps per unit of channel intensity
const CHANNEL_STEPS: u32 = 10_000;

/// Red channel increment per frame, in fixed-point steps (1e-4)
pub const RED_STEP: u32 = 1;

/// RGBA clear color, each channel in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClearColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl ClearColor {
    /// Channels as `[r, g, b, a]`
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One animated color channel
///
/// Stored as an integer step count so the wrap happens on exactly the frame
/// where the accumulated value first exceeds 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Channel {
    steps: u32,
    increment: u32,
}

impl Channel {
    const fn animated(increment: u32) -> Self {
        Self { steps: 0, increment }
    }

    fn advance(&mut self) {
        self.steps += self.increment;
    }

    fn wrap(&mut self) {
        if self.steps > CHANNEL_STEPS {
            self.steps = 0;
        }
    }

    #[allow(clippy::cast_precision_loss)] // steps never exceed CHANNEL_STEPS
    fn value(self) -> f32 {
        self.steps as f32 / CHANNEL_STEPS as f32
    }
}

/// Loop-local state: animated clear color and the running flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameState {
    red: Channel,
    // green and blue are reserved; they never move
    green: Channel,
    blue: Channel,
    alpha: Channel,
    running: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameState {
    /// Black, transparent, running
    pub const fn new() -> Self {
        Self {
            red: Channel::animated(RED_STEP),
            green: Channel::animated(0),
            blue: Channel::animated(0),
            alpha: Channel::animated(0),
            running: true,
        }
    }

    /// Whether the loop should keep going
    pub const fn running(&self) -> bool {
        self.running
    }

    /// React to one platform event
    pub fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Quit => self.running = false,
            PlatformEvent::Resized { width, height } => {
                log::debug!("Framebuffer resized to {width}x{height}; viewport unchanged");
            }
            PlatformEvent::Other => {}
        }
    }

    /// Advance the animation by one frame, then wrap
    pub fn advance(&mut self) {
        for channel in [&mut self.red, &mut self.green, &mut self.blue, &mut self.alpha] {
            channel.advance();
            channel.wrap();
        }
    }

    /// Current clear color
    pub fn color(&self) -> ClearColor {
        ClearColor {
            r: self.red.value(),
            g: self.green.value(),
            b: self.blue.value(),
            a: self.alpha.value(),
        }
    }
}

/// Summary of a finished loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames presented
    pub frames: u64,
    /// Wall time spent in the loop, in seconds
    pub elapsed_secs: f32,
    /// Clear color of the last presented frame
    pub final_color: ClearColor,
}

impl FrameStats {
    /// Average frames per second over the whole run
    pub fn average_fps(&self) -> f32 {
        Timer::rate(self.frames, self.elapsed_secs)
    }
}

/// Drives a [`RenderSurface`] until a quit event arrives
pub struct FrameLoop<'a, 's, P: Platform> {
    surface: &'a mut RenderSurface<'s, P>,
    state: FrameState,
    events: Vec<PlatformEvent>,
    timer: Timer,
}

impl<'a, 's, P: Platform> FrameLoop<'a, 's, P> {
    /// Prepare a loop over `surface`
    pub fn new(surface: &'a mut RenderSurface<'s, P>) -> Self {
        Self {
            surface,
            state: FrameState::new(),
            events: Vec::new(),
            timer: Timer::new(),
        }
    }

    /// Run one iteration: drain events, advance, clear, present
    ///
    /// A quit event stops the loop after the current frame is presented.
    pub fn step(&mut self) {
        self.surface.poll_events(&mut self.events);
        for event in self.events.drain(..) {
            self.state.handle_event(event);
        }

        self.state.advance();

        self.surface.clear(self.state.color());
        self.surface.present();
        self.timer.update();
    }

    /// Run until quit
    pub fn run(mut self) -> FrameStats {
        log::info!("Entering frame loop");
        while self.state.running() {
            self.step();
        }

        let stats = FrameStats {
            frames: self.timer.frame_count(),
            elapsed_secs: self.timer.total_time(),
            final_color: self.state.color(),
        };
        log::info!(
            "Frame loop finished: {} frames in {:.2}s ({:.1} fps)",
            stats.frames,
            stats.elapsed_secs,
            stats.average_fps()
        );
        stats
    }
}
