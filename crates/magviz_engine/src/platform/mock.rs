//! Recording platform for tests
//!
//! Every call made through [`Platform`] and [`GraphicsApi`] is appended to a
//! shared [`Journal`], and each bring-up phase can be told to fail.

use super::{ContextAttribute, Platform, PlatformError, PlatformEvent, SwapInterval};
use crate::config::WindowConfig;
use crate::render::gl::GraphicsApi;
use crate::render::ClearColor;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::thread::ThreadId;

/// One recorded platform or graphics call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    SetAttribute(ContextAttribute, i32),
    CreateWindow {
        title: String,
        width: u32,
        height: u32,
    },
    CreateContext,
    MakeCurrent(ThreadId),
    LoadFunctions,
    QueryAttribute(ContextAttribute),
    SetSwapInterval(i32),
    PollEvents,
    SetClearColor([f32; 4]),
    ClearColorBuffer,
    Present,
    ReleaseCurrent,
    DestroyContext,
    DestroyWindow,
    Shutdown,
}

/// Shared call log
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    /// Calls with the per-frame traffic filtered out
    pub fn lifecycle(&self) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::PollEvents
                        | Call::SetClearColor(_)
                        | Call::ClearColorBuffer
                        | Call::Present
                        | Call::SetAttribute(..)
                        | Call::QueryAttribute(_)
                        | Call::SetSwapInterval(_)
                )
            })
            .cloned()
            .collect()
    }

    pub fn last_clear_color(&self) -> Option<[f32; 4]> {
        self.0.borrow().iter().rev().find_map(|c| match c {
            Call::SetClearColor(rgba) => Some(*rgba),
            _ => None,
        })
    }
}

/// Fault injection and granted values
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub reject_hint: Option<ContextAttribute>,
    pub fail_window: bool,
    pub fail_context: bool,
    pub fail_make_current: bool,
    pub fail_loader: bool,
    pub fail_query: Option<ContextAttribute>,
    /// Granted values; attributes not listed echo the hinted value
    pub granted: HashMap<ContextAttribute, i32>,
    pub refuse_adaptive_vsync: bool,
    /// 1-based poll on which quit events are delivered
    pub quit_on_poll: u64,
    pub quit_events: usize,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            reject_hint: None,
            fail_window: false,
            fail_context: false,
            fail_make_current: false,
            fail_loader: false,
            fail_query: None,
            granted: HashMap::new(),
            refuse_adaptive_vsync: false,
            quit_on_poll: 1,
            quit_events: 1,
        }
    }
}

#[derive(Debug)]
pub struct MockWindow;

#[derive(Debug)]
pub struct MockContext;

pub struct MockGl {
    journal: Journal,
}

impl GraphicsApi for MockGl {
    fn set_clear_color(&mut self, color: ClearColor) {
        self.journal.push(Call::SetClearColor(color.to_array()));
    }

    fn clear_color_buffer(&mut self) {
        self.journal.push(Call::ClearColorBuffer);
    }

    fn version_string(&self) -> Option<String> {
        Some("3.3.0 Mock".to_string())
    }

    fn renderer_string(&self) -> Option<String> {
        Some("Mock Renderer".to_string())
    }
}

pub struct MockPlatform {
    behavior: MockBehavior,
    journal: Journal,
    hinted: HashMap<ContextAttribute, i32>,
    polls: u64,
}

impl MockPlatform {
    /// Initializer closure plus the journal it will record into
    pub fn factory(
        behavior: MockBehavior,
    ) -> (impl FnOnce() -> Result<Self, PlatformError>, Journal) {
        let journal = Journal::default();
        let recorder = journal.clone();
        let init = move || {
            recorder.push(Call::Init);
            Ok(Self {
                behavior,
                journal: recorder,
                hinted: HashMap::new(),
                polls: 0,
            })
        };
        (init, journal)
    }
}

fn fail(phase: &str) -> PlatformError {
    PlatformError::new(format!("injected {phase} failure"))
}

impl Platform for MockPlatform {
    type Window = MockWindow;
    type Context = MockContext;
    type Api = MockGl;

    fn set_attribute(
        &mut self,
        attribute: ContextAttribute,
        value: i32,
    ) -> Result<(), PlatformError> {
        self.journal.push(Call::SetAttribute(attribute, value));
        if self.behavior.reject_hint == Some(attribute) {
            return Err(fail("hint"));
        }
        self.hinted.insert(attribute, value);
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<MockWindow, PlatformError> {
        if self.behavior.fail_window {
            return Err(fail("window"));
        }
        self.journal.push(Call::CreateWindow {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        });
        Ok(MockWindow)
    }

    fn create_context(&mut self, _window: &mut MockWindow) -> Result<MockContext, PlatformError> {
        if self.behavior.fail_context {
            return Err(fail("context"));
        }
        self.journal.push(Call::CreateContext);
        Ok(MockContext)
    }

    fn make_current(
        &mut self,
        _window: &mut MockWindow,
        _context: &MockContext,
    ) -> Result<(), PlatformError> {
        if self.behavior.fail_make_current {
            return Err(fail("make-current"));
        }
        self.journal.push(Call::MakeCurrent(std::thread::current().id()));
        Ok(())
    }

    fn load_functions(&mut self, _window: &mut MockWindow) -> Result<MockGl, PlatformError> {
        if self.behavior.fail_loader {
            return Err(fail("loader"));
        }
        self.journal.push(Call::LoadFunctions);
        Ok(MockGl {
            journal: self.journal.clone(),
        })
    }

    fn query_attribute(
        &mut self,
        _window: &MockWindow,
        attribute: ContextAttribute,
    ) -> Result<i32, PlatformError> {
        self.journal.push(Call::QueryAttribute(attribute));
        if self.behavior.fail_query == Some(attribute) {
            return Err(fail("query"));
        }
        let granted = self
            .behavior
            .granted
            .get(&attribute)
            .or_else(|| self.hinted.get(&attribute))
            .copied()
            .unwrap_or(0);
        Ok(granted)
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) -> Result<(), PlatformError> {
        self.journal.push(Call::SetSwapInterval(interval.to_raw()));
        if interval == SwapInterval::Adaptive && self.behavior.refuse_adaptive_vsync {
            return Err(PlatformError::new("adaptive vsync not supported"));
        }
        Ok(())
    }

    fn poll_events(&mut self, _window: &mut MockWindow, events: &mut Vec<PlatformEvent>) {
        self.journal.push(Call::PollEvents);
        self.polls += 1;
        events.push(PlatformEvent::Other);
        if self.polls == self.behavior.quit_on_poll {
            events.push(PlatformEvent::Resized { width: 640, height: 480 });
            events.extend(std::iter::repeat(PlatformEvent::Quit).take(self.behavior.quit_events));
        }
    }

    fn present(&mut self, _window: &mut MockWindow) {
        self.journal.push(Call::Present);
    }

    fn release_current(&mut self, _window: &mut MockWindow) {
        self.journal.push(Call::ReleaseCurrent);
    }

    fn destroy_context(&mut self, _window: &mut MockWindow, _context: MockContext) {
        self.journal.push(Call::DestroyContext);
    }

    fn destroy_window(&mut self, _window: MockWindow) {
        self.journal.push(Call::DestroyWindow);
    }

    fn shutdown(self) {
        self.journal.push(Call::Shutdown);
    }
}
